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

//! Severity levels and the registries that order them.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;

use crate::Error;

/// A named severity.
///
/// A `Level` carries no ordering of its own: its position is defined by the [`LevelRegistry`]
/// it is looked up in. A level that is not registered never satisfies a threshold.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Level(Cow<'static, str>);

impl Level {
    /// Designates very low priority, often extremely verbose, information.
    pub const TRACE: Level = Level::new_static("TRACE");
    /// Noisy output, useful while developing and testing.
    pub const DEBUG: Level = Level::new_static("DEBUG");
    /// Information needed to debug production issues.
    pub const INFO: Level = Level::new_static("INFO");
    /// Events that need investigation, but not right now.
    pub const WARNING: Level = Level::new_static("WARNING");
    /// Events that need attention immediately.
    pub const ERROR: Level = Level::new_static("ERROR");
    /// Failures that leave a component unusable.
    pub const CRITICAL: Level = Level::new_static("CRITICAL");
    /// Failures the process cannot survive.
    pub const FATAL: Level = Level::new_static("FATAL");

    /// Create a level from a static name.
    pub const fn new_static(name: &'static str) -> Level {
        Level(Cow::Borrowed(name))
    }

    /// Create a level from a runtime name, e.g. one read from configuration.
    pub fn new(name: impl Into<String>) -> Level {
        Level(Cow::Owned(name.into()))
    }

    /// Return the display name of the level.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Level {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <String as serde::Deserialize>::deserialize(deserializer).map(Level::new)
    }
}

/// An ordered set of levels, from the least to the most severe.
///
/// Ordinals are dense and follow declaration order. A registry is immutable once built and is
/// shared between loggers through an [`Arc`].
///
/// # Examples
///
/// ```
/// use mlog::Level;
/// use mlog::LevelRegistry;
///
/// let registry = LevelRegistry::standard();
/// assert_eq!(registry.ordinal(&Level::DEBUG), Some(0));
/// assert_eq!(registry.ordinal(&Level::ERROR), Some(3));
/// assert_eq!(registry.ordinal(&Level::TRACE), None);
/// ```
#[derive(Debug, Clone)]
pub struct LevelRegistry {
    levels: Vec<Level>,
    ordinals: HashMap<Level, usize>,
    default_threshold: Level,
}

static STANDARD: LazyLock<Arc<LevelRegistry>> = LazyLock::new(|| {
    Arc::new(LevelRegistry::from_declared(
        vec![Level::DEBUG, Level::INFO, Level::WARNING, Level::ERROR],
        Level::INFO,
    ))
});

static FINE: LazyLock<Arc<LevelRegistry>> = LazyLock::new(|| {
    Arc::new(LevelRegistry::from_declared(
        vec![
            Level::TRACE,
            Level::DEBUG,
            Level::INFO,
            Level::WARNING,
            Level::ERROR,
            Level::CRITICAL,
            Level::FATAL,
        ],
        Level::INFO,
    ))
});

impl LevelRegistry {
    /// Build a registry from levels in ascending severity.
    ///
    /// `default_threshold` is the threshold loggers start with, and the level configuration
    /// diagnostics are reported at.
    ///
    /// # Errors
    ///
    /// Return an error if `levels` is empty, declares a level twice, or does not contain
    /// `default_threshold`.
    pub fn new(
        levels: impl IntoIterator<Item = Level>,
        default_threshold: Level,
    ) -> Result<Self, Error> {
        let levels = levels.into_iter().collect::<Vec<_>>();
        if levels.is_empty() {
            return Err(Error::new("level registry must declare at least one level"));
        }

        let mut ordinals = HashMap::with_capacity(levels.len());
        for (ordinal, level) in levels.iter().enumerate() {
            if ordinals.insert(level.clone(), ordinal).is_some() {
                return Err(Error::new("level declared more than once")
                    .with_context("level", level));
            }
        }

        if !ordinals.contains_key(&default_threshold) {
            return Err(Error::new("default threshold is not a declared level")
                .with_context("threshold", &default_threshold));
        }

        Ok(Self {
            levels,
            ordinals,
            default_threshold,
        })
    }

    // Built-in level lists are known to be valid.
    fn from_declared(levels: Vec<Level>, default_threshold: Level) -> Self {
        let ordinals = levels
            .iter()
            .enumerate()
            .map(|(ordinal, level)| (level.clone(), ordinal))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(ordinals.len(), levels.len());
        debug_assert!(ordinals.contains_key(&default_threshold));

        Self {
            levels,
            ordinals,
            default_threshold,
        }
    }

    /// The four level scale: `DEBUG`, `INFO`, `WARNING`, `ERROR`. Defaults to `INFO`.
    pub fn standard() -> Arc<LevelRegistry> {
        STANDARD.clone()
    }

    /// The seven level scale: `TRACE`, `DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`, `FATAL`.
    /// Defaults to `INFO`.
    pub fn fine() -> Arc<LevelRegistry> {
        FINE.clone()
    }

    /// Return the ordinal of `level`, or `None` if it is not registered.
    pub fn ordinal(&self, level: &Level) -> Option<usize> {
        self.ordinals.get(level).copied()
    }

    /// Return whether `level` is registered.
    pub fn contains(&self, level: &Level) -> bool {
        self.ordinals.contains_key(level)
    }

    /// Find a registered level by name, ignoring ASCII case.
    ///
    /// ```
    /// use mlog::Level;
    /// use mlog::LevelRegistry;
    ///
    /// let registry = LevelRegistry::standard();
    /// assert_eq!(registry.parse("warning"), Some(Level::WARNING));
    /// assert_eq!(registry.parse("verbose"), None);
    /// ```
    pub fn parse(&self, name: &str) -> Option<Level> {
        self.levels
            .iter()
            .find(|level| level.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// The level new loggers start with.
    pub fn default_threshold(&self) -> &Level {
        &self.default_threshold
    }

    /// Iterate the registered levels from the least to the most severe.
    pub fn levels(&self) -> impl ExactSizeIterator<Item = &Level> {
        self.levels.iter()
    }
}
