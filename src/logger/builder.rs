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

use std::sync::Arc;

use crate::Error;
use crate::Fields;
use crate::Level;
use crate::LevelRegistry;
use crate::Logger;
use crate::sink;
use crate::sink::Sink;
use crate::sink::Stdout;

/// A builder for configuring a [`Logger`].
///
/// Defaults to the [standard](LevelRegistry::standard) registry at its default threshold, every
/// field enabled, and stdout when no sink is configured.
///
/// # Examples
///
/// ```
/// use mlog::Fields;
/// use mlog::Level;
/// use mlog::LevelRegistry;
/// use mlog::Logger;
/// use mlog::sink::Capture;
///
/// let capture = Capture::default();
/// let logger = Logger::builder()
///     .registry(LevelRegistry::fine())
///     .threshold(Level::TRACE)
///     .fields(Fields::LEVEL)
///     .sink(capture.clone())
///     .build()
///     .unwrap();
///
/// logger.log(&Level::TRACE, "fine grained").unwrap();
/// assert_eq!(capture.contents(), "[TRACE] fine grained\n");
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    registry: Arc<LevelRegistry>,
    threshold: Option<Level>,
    fields: Fields,
    sinks: Vec<Box<dyn Sink>>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a new [`LoggerBuilder`].
    pub fn new() -> Self {
        Self {
            registry: LevelRegistry::standard(),
            threshold: None,
            fields: Fields::ALL,
            sinks: vec![],
        }
    }

    /// Set the registry ordering the logger's levels.
    pub fn registry(mut self, registry: Arc<LevelRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Set the initial threshold. Default to the registry's default threshold.
    pub fn threshold(mut self, threshold: Level) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the fields prefixed to each entry.
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Add a destination. Several destinations are combined into a
    /// [`FanOut`](crate::sink::FanOut).
    pub fn sink(mut self, sink: impl Into<Box<dyn Sink>>) -> Self {
        self.sinks.push(sink.into());
        self
    }

    /// Construct the [`Logger`].
    ///
    /// # Errors
    ///
    /// Return an error if the threshold is not part of the registry.
    pub fn build(self) -> Result<Logger, Error> {
        let threshold = match self.threshold {
            Some(threshold) => threshold,
            None => self.registry.default_threshold().clone(),
        };
        if !self.registry.contains(&threshold) {
            return Err(Error::new("threshold is not a registered level")
                .with_context("threshold", threshold));
        }

        let sink = sink::compose(self.sinks).unwrap_or_else(|| Arc::new(Stdout::default()));
        Ok(Logger::from_parts(
            self.registry,
            threshold,
            self.fields,
            sink,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Capture;

    #[test]
    fn defaults_follow_the_registry() {
        let logger = LoggerBuilder::new().build().unwrap();
        assert_eq!(logger.threshold(), Level::INFO);
        assert_eq!(logger.fields(), Fields::ALL);

        let logger = Logger::builder()
            .registry(LevelRegistry::fine())
            .build()
            .unwrap();
        assert_eq!(logger.registry().levels().len(), 7);
    }

    #[test]
    fn rejects_unregistered_thresholds() {
        let err = Logger::builder()
            .threshold(Level::FATAL)
            .build()
            .unwrap_err();
        assert_eq!(err.message(), "threshold is not a registered level");
    }

    #[test]
    fn several_sinks_fan_out() {
        let first = Capture::default();
        let second = Capture::default();
        let logger = Logger::builder()
            .fields(Fields::NONE)
            .sink(first.clone())
            .sink(second.clone())
            .build()
            .unwrap();
        logger.page_me_now("everywhere").unwrap();
        assert_eq!(first.contents(), "everywhere\n");
        assert_eq!(second.contents(), "everywhere\n");
    }

    #[test]
    fn custom_registry_levels() {
        let low = Level::new_static("LOW");
        let high = Level::new_static("HIGH");
        let registry = LevelRegistry::new(vec![low.clone(), high.clone()], high.clone()).unwrap();
        let capture = Capture::default();
        let logger = Logger::builder()
            .registry(Arc::new(registry))
            .fields(Fields::LEVEL)
            .sink(capture.clone())
            .build()
            .unwrap();

        logger.log(&low, "quiet").unwrap();
        logger.log(&high, "loud").unwrap();
        assert_eq!(capture.contents(), "[HIGH] loud\n");

        // the standard names are not part of this registry
        logger.in_production("lost").unwrap();
        assert!(capture.contents().ends_with("invalid log level in comparison: INFO >= HIGH\n"));
    }
}
