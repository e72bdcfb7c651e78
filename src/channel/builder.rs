// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashSet;
use std::sync::Arc;

use crate::Channels;
use crate::Error;
use crate::Fields;
use crate::Level;
use crate::LevelRegistry;
use crate::sink::Sink;

/// A builder for configuring [`Channels`].
///
/// Defaults to the [standard](LevelRegistry::standard) registry at its default threshold and
/// every field enabled. Channels are declared one by one; unlike
/// [`Channels::standard`], none exist up front.
#[must_use = "call `build` to construct the channels"]
#[derive(Debug)]
pub struct ChannelsBuilder {
    registry: Arc<LevelRegistry>,
    threshold: Option<Level>,
    fields: Fields,
    channels: Vec<(String, Level, Box<dyn Sink>)>,
}

impl Default for ChannelsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelsBuilder {
    /// Create a new [`ChannelsBuilder`].
    pub fn new() -> Self {
        Self {
            registry: LevelRegistry::standard(),
            threshold: None,
            fields: Fields::ALL,
            channels: vec![],
        }
    }

    /// Set the registry ordering the channels' levels.
    pub fn registry(mut self, registry: Arc<LevelRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the initial threshold. Default to the registry's default threshold.
    pub fn threshold(mut self, threshold: Level) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the fields every channel starts with.
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Declare a channel called `name`, tagged with `level` and writing to `sink`.
    ///
    /// Several channels may share a level; configuration diagnostics go to the first channel
    /// declared at the registry's default threshold.
    pub fn channel(
        mut self,
        name: impl Into<String>,
        level: Level,
        sink: impl Into<Box<dyn Sink>>,
    ) -> Self {
        self.channels.push((name.into(), level, sink.into()));
        self
    }

    /// Construct the [`Channels`].
    ///
    /// # Errors
    ///
    /// Return an error if the threshold or a channel's level is not part of the registry, or if
    /// two channels share a name.
    pub fn build(self) -> Result<Channels, Error> {
        let threshold = match self.threshold {
            Some(threshold) => threshold,
            None => self.registry.default_threshold().clone(),
        };
        if !self.registry.contains(&threshold) {
            return Err(Error::new("threshold is not a registered level")
                .with_context("threshold", threshold));
        }

        let mut names = HashSet::with_capacity(self.channels.len());
        for (name, level, _) in &self.channels {
            if !self.registry.contains(level) {
                return Err(Error::new("channel level is not a registered level")
                    .with_context("channel", name)
                    .with_context("level", level));
            }
            if !names.insert(name.as_str()) {
                return Err(
                    Error::new("channel declared more than once").with_context("channel", name)
                );
            }
        }

        let channels = self
            .channels
            .into_iter()
            .map(|(name, level, sink)| (name, level, Arc::from(sink)))
            .collect();
        Ok(Channels::assemble(
            self.registry,
            threshold,
            self.fields,
            channels,
        ))
    }
}
