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

//! Named severity channels with independently redirectable sinks.
//!
//! Unlike [`Logger`](crate::Logger), a [`Channels`] registry never compares levels while
//! writing. Changing the threshold rebinds every channel below it to a discard sink, and every
//! other channel to its configured sink; a write goes to whatever is bound at that moment.
//!
//! A message's `Display` impl runs under the lock of the channel being written. While it runs,
//! writes it makes are dropped, setters are skipped and flushing does nothing. The getters of
//! the written [`Channel`] must not be called from there: they wait for that lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::CallSite;
use crate::Error;
use crate::Fields;
use crate::Level;
use crate::LevelRegistry;
use crate::guard::EmitGuard;
use crate::layout::format_entry;
use crate::sink;
use crate::sink::Discard;
use crate::sink::Sink;
use crate::sink::Stdout;

mod builder;

pub use self::builder::ChannelsBuilder;

/// A registry of named channels, each bound to a level.
///
/// # Examples
///
/// ```
/// use mlog::Channels;
/// use mlog::Fields;
/// use mlog::Level;
/// use mlog::sink::Capture;
///
/// let warnings = Capture::default();
/// let errors = Capture::default();
/// let channels = Channels::builder()
///     .fields(Fields::LEVEL)
///     .channel("warn", Level::WARNING, warnings.clone())
///     .channel("error", Level::ERROR, errors.clone())
///     .threshold(Level::WARNING)
///     .build()
///     .unwrap();
///
/// channels.write("warn", "low disk space").unwrap();
/// channels.set_threshold(Level::ERROR);
/// channels.write("warn", "lower disk space").unwrap();
/// channels.write("error", "out of disk space").unwrap();
///
/// assert_eq!(warnings.contents(), "[WARNING] low disk space\n");
/// assert_eq!(errors.contents(), "[ERROR] out of disk space\n");
/// ```
#[derive(Debug)]
pub struct Channels {
    registry: Arc<LevelRegistry>,
    channels: HashMap<String, Arc<Channel>>,
    // channel receiving configuration diagnostics
    diagnostics: Option<Arc<Channel>>,
    threshold: Mutex<Level>,
    discard: Arc<dyn Sink>,
}

/// One named channel of a [`Channels`] registry.
///
/// A channel is a small logger of its own: it formats entries at its level with its fields and
/// writes them to its currently bound sink, without consulting the registry.
#[derive(Debug)]
pub struct Channel {
    name: String,
    level: Level,
    ordinal: usize,
    state: Mutex<ChannelState>,
}

#[derive(Debug)]
struct ChannelState {
    configured: Arc<dyn Sink>,
    current: Arc<dyn Sink>,
    live: bool,
    fields: Fields,
    buffer: Vec<u8>,
}

impl Channel {
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The name of this channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The level entries of this channel are tagged with.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// The fields prefixed to each entry.
    pub fn fields(&self) -> Fields {
        self.lock().fields
    }

    /// Return whether writes currently reach the configured sink.
    pub fn is_live(&self) -> bool {
        self.lock().live
    }

    /// Write `message` to the currently bound sink.
    ///
    /// # Errors
    ///
    /// Return an error if the sink fails to write the entry, or if the `Display` impl of
    /// `message` fails.
    #[track_caller]
    pub fn write(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.emit(CallSite::caller(), &message)
    }

    /// Flush the currently bound sink.
    pub fn flush(&self) -> Result<(), Error> {
        if EmitGuard::is_active() {
            return Ok(());
        }
        let current = self.lock().current.clone();
        current.flush()
    }

    fn emit(&self, call_site: CallSite<'_>, message: &dyn fmt::Display) -> Result<(), Error> {
        let Some(_guard) = EmitGuard::enter() else {
            return Ok(());
        };
        let mut state = self.lock();
        let ChannelState {
            current,
            fields,
            buffer,
            ..
        } = &mut *state;
        format_entry(buffer, *fields, &self.level, call_site, message)?;
        current.write(buffer)
    }

    fn rebind(&self, state: &mut ChannelState, threshold: usize, discard: &Arc<dyn Sink>) {
        state.live = self.ordinal >= threshold;
        state.current = if state.live {
            state.configured.clone()
        } else {
            discard.clone()
        };
    }
}

impl Channels {
    /// Create a new [`ChannelsBuilder`].
    pub fn builder() -> ChannelsBuilder {
        ChannelsBuilder::new()
    }

    /// The standard channels `debug`, `info`, `warn` and `error`, bound to the
    /// [standard](LevelRegistry::standard) levels, writing every field to stdout from the `INFO`
    /// threshold up.
    pub fn standard() -> Channels {
        let registry = LevelRegistry::standard();
        let threshold = registry.default_threshold().clone();
        let stdout: Arc<dyn Sink> = Arc::new(Stdout::default());
        let channels = [
            ("debug", Level::DEBUG),
            ("info", Level::INFO),
            ("warn", Level::WARNING),
            ("error", Level::ERROR),
        ]
        .into_iter()
        .map(|(name, level)| (name.to_owned(), level, stdout.clone()))
        .collect();
        Channels::assemble(registry, threshold, Fields::ALL, channels)
    }

    // Channels whose level is not registered are skipped; the builder rejects them beforehand.
    pub(super) fn assemble(
        registry: Arc<LevelRegistry>,
        threshold: Level,
        fields: Fields,
        declared: Vec<(String, Level, Arc<dyn Sink>)>,
    ) -> Channels {
        let threshold_ordinal = registry.ordinal(&threshold).unwrap_or_default();
        let discard: Arc<dyn Sink> = Arc::new(Discard::default());

        let mut channels = HashMap::with_capacity(declared.len());
        let mut diagnostics = None;
        for (name, level, configured) in declared {
            let Some(ordinal) = registry.ordinal(&level) else {
                continue;
            };

            let live = ordinal >= threshold_ordinal;
            let current = if live {
                configured.clone()
            } else {
                discard.clone()
            };
            let channel = Arc::new(Channel {
                name: name.clone(),
                level,
                ordinal,
                state: Mutex::new(ChannelState {
                    configured,
                    current,
                    live,
                    fields,
                    buffer: Vec::with_capacity(256),
                }),
            });

            if diagnostics.is_none() && channel.level == *registry.default_threshold() {
                diagnostics = Some(channel.clone());
            }
            channels.insert(name, channel);
        }

        Channels {
            registry,
            channels,
            diagnostics,
            threshold: Mutex::new(threshold),
            discard,
        }
    }

    fn lock_threshold(&self) -> MutexGuard<'_, Level> {
        self.threshold.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Best effort: the diagnostic channel may be unbound or missing.
    fn diagnose(&self, call_site: CallSite<'_>, message: &dyn fmt::Display) {
        if let Some(channel) = &self.diagnostics {
            let _ = channel.emit(call_site, message);
        }
    }

    /// The registry ordering the channels' levels.
    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    /// The current threshold.
    pub fn threshold(&self) -> Level {
        self.lock_threshold().clone()
    }

    /// Return the channel called `name`.
    pub fn channel(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels.get(name).cloned()
    }

    /// Iterate the channel names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Set the least severe level whose channels reach their sinks.
    ///
    /// An unregistered level is reported as a diagnostic and the previous threshold is kept.
    #[track_caller]
    pub fn set_threshold(&self, level: Level) {
        if EmitGuard::is_active() {
            return;
        }
        let call_site = CallSite::caller();
        let mut threshold = self.lock_threshold();
        let Some(ordinal) = self.registry.ordinal(&level) else {
            self.diagnose(
                call_site,
                &format_args!("set_threshold: unknown level {level:?}"),
            );
            return;
        };

        *threshold = level;
        for channel in self.channels.values() {
            let mut state = channel.lock();
            channel.rebind(&mut state, ordinal, &self.discard);
        }
    }

    /// Replace the destination of the channel called `name`.
    #[track_caller]
    pub fn set_sink(&self, name: &str, sink: impl Into<Box<dyn Sink>>) {
        self.set_sinks(name, vec![sink.into()]);
    }

    /// Replace the destinations of the channel called `name`.
    ///
    /// Several sinks are combined into a [`FanOut`](sink::FanOut). An unknown channel or an empty
    /// list is reported as a diagnostic and changes nothing. The new sink only becomes current
    /// if the channel meets the threshold.
    #[track_caller]
    pub fn set_sinks(&self, name: &str, sinks: Vec<Box<dyn Sink>>) {
        if EmitGuard::is_active() {
            return;
        }
        let call_site = CallSite::caller();
        let Some(channel) = self.channels.get(name) else {
            self.diagnose(
                call_site,
                &format_args!("set_sinks: unknown channel {name:?}"),
            );
            return;
        };
        let Some(configured) = sink::compose(sinks) else {
            self.diagnose(
                call_site,
                &format_args!("set_sinks: no destination provided for channel {name:?}"),
            );
            return;
        };

        let threshold = self.lock_threshold();
        let ordinal = self.registry.ordinal(&threshold).unwrap_or_default();
        let mut state = channel.lock();
        state.configured = configured;
        channel.rebind(&mut state, ordinal, &self.discard);
    }

    /// Set the fields of every channel.
    pub fn set_fields(&self, fields: Fields) {
        if EmitGuard::is_active() {
            return;
        }
        for channel in self.channels.values() {
            channel.lock().fields = fields;
        }
    }

    /// Set the fields of the channel called `name`.
    ///
    /// An unknown channel is reported as a diagnostic.
    #[track_caller]
    pub fn set_channel_fields(&self, name: &str, fields: Fields) {
        if EmitGuard::is_active() {
            return;
        }
        match self.channels.get(name) {
            Some(channel) => channel.lock().fields = fields,
            None => self.diagnose(
                CallSite::caller(),
                &format_args!("set_channel_fields: unknown channel {name:?}"),
            ),
        }
    }

    /// Turn the `[LEVEL]` tag on or off for every channel, keeping their other fields.
    pub fn with_prefix(&self, enabled: bool) {
        if EmitGuard::is_active() {
            return;
        }
        for channel in self.channels.values() {
            channel.lock().fields.set(Fields::LEVEL, enabled);
        }
    }

    /// Write `message` to the channel called `name`.
    ///
    /// Writing to an unknown channel does nothing, so optional channels can be probed freely.
    ///
    /// # Errors
    ///
    /// Return an error if the bound sink fails to write the entry, or if the `Display` impl of
    /// `message` fails.
    #[track_caller]
    pub fn write(&self, name: &str, message: impl fmt::Display) -> Result<(), Error> {
        match self.channels.get(name) {
            Some(channel) => channel.emit(CallSite::caller(), &message),
            None => Ok(()),
        }
    }

    /// Flush the bound sink of every channel, returning the first failure.
    pub fn flush(&self) -> Result<(), Error> {
        let mut first_error = None;
        for channel in self.channels.values() {
            if let Err(err) = channel.flush() {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Capture;

    struct Fixture {
        channels: Channels,
        debug: Capture,
        info: Capture,
        warn: Capture,
        error: Capture,
    }

    fn fixture(fields: Fields) -> Fixture {
        let debug = Capture::default();
        let info = Capture::default();
        let warn = Capture::default();
        let error = Capture::default();
        let channels = Channels::builder()
            .fields(fields)
            .channel("debug", Level::DEBUG, debug.clone())
            .channel("info", Level::INFO, info.clone())
            .channel("warn", Level::WARNING, warn.clone())
            .channel("error", Level::ERROR, error.clone())
            .build()
            .unwrap();
        Fixture {
            channels,
            debug,
            info,
            warn,
            error,
        }
    }

    #[test]
    fn default_threshold_binds_channels() {
        let f = fixture(Fields::NONE);
        assert_eq!(f.channels.threshold(), Level::INFO);
        for (name, live) in [("debug", false), ("info", true), ("warn", true), ("error", true)] {
            assert_eq!(f.channels.channel(name).unwrap().is_live(), live, "{name}");
            f.channels.write(name, name).unwrap();
        }
        assert!(f.debug.is_empty());
        assert_eq!(f.info.contents(), "info\n");
        assert_eq!(f.warn.contents(), "warn\n");
        assert_eq!(f.error.contents(), "error\n");
    }

    #[test]
    fn raising_the_threshold_discards_lower_channels() {
        let f = fixture(Fields::NONE);
        f.channels.set_threshold(Level::WARNING);
        f.channels.write("error", "standard error").unwrap();
        f.channels.write("warn", "warning message").unwrap();
        assert_eq!(f.error.contents(), "standard error\n");
        assert_eq!(f.warn.contents(), "warning message\n");

        f.channels.set_threshold(Level::ERROR);
        f.channels.write("warn", "dropped").unwrap();
        f.channels.write("error", "kept").unwrap();
        assert_eq!(f.warn.contents(), "warning message\n");
        assert_eq!(f.error.contents(), "standard error\nkept\n");
    }

    #[test]
    fn lowering_the_threshold_restores_sinks() {
        let f = fixture(Fields::NONE);
        f.channels.set_threshold(Level::ERROR);
        f.channels.set_threshold(Level::DEBUG);
        f.channels.write("debug", "noisy").unwrap();
        assert_eq!(f.debug.contents(), "noisy\n");
    }

    #[test]
    fn unknown_threshold_is_reported_and_ignored() {
        let f = fixture(Fields::NONE);
        f.channels.set_threshold(Level::new("whatever"));
        assert_eq!(f.channels.threshold(), Level::INFO);
        assert_eq!(f.info.contents(), "set_threshold: unknown level whatever\n");
    }

    #[test]
    fn unknown_channels_are_silent_on_write() {
        let f = fixture(Fields::ALL);
        assert!(f.channels.write("audit", "nobody listens").is_ok());
        assert!(f.channels.channel("audit").is_none());
        assert!(f.info.is_empty());
    }

    #[test]
    fn sink_swaps_respect_the_threshold() {
        let f = fixture(Fields::NONE);
        let replacement = Capture::default();
        f.channels.set_sink("debug", replacement.clone());
        f.channels.write("debug", "below threshold").unwrap();
        assert!(replacement.is_empty());

        f.channels.set_threshold(Level::DEBUG);
        f.channels.write("debug", "now live").unwrap();
        assert_eq!(replacement.contents(), "now live\n");
        assert!(f.debug.is_empty());
    }

    #[test]
    fn sink_swaps_with_fan_out() {
        let f = fixture(Fields::NONE);
        let extra = Capture::default();
        f.channels
            .set_sinks("warn", vec![f.warn.clone().into(), extra.clone().into()]);
        f.channels.write("warn", "test message").unwrap();
        assert_eq!(f.warn.contents(), "test message\n");
        assert_eq!(extra.contents(), "test message\n");
    }

    #[test]
    fn configuration_mistakes_are_reported_on_the_info_channel() {
        let f = fixture(Fields::NONE);
        f.channels.set_sinks("warn", vec![]);
        f.channels.set_sink("audit", Capture::default());
        f.channels.set_channel_fields("audit", Fields::ALL);
        assert_eq!(
            f.info.lines(),
            vec![
                r#"set_sinks: no destination provided for channel "warn""#,
                r#"set_sinks: unknown channel "audit""#,
                r#"set_channel_fields: unknown channel "audit""#,
            ]
        );

        // the previous sink is still bound
        f.channels.write("warn", "empty").unwrap();
        assert_eq!(f.warn.contents(), "empty\n");
    }

    #[test]
    fn fields_per_channel() {
        let f = fixture(Fields::NONE);
        f.channels.set_channel_fields("warn", Fields::FILE);
        let line = line!() + 1;
        f.channels.write("warn", "located").unwrap();
        f.channels.write("error", "plain").unwrap();
        assert_eq!(f.warn.contents(), format!("mod.rs:{line}: located\n"));
        assert_eq!(f.error.contents(), "plain\n");
        assert_eq!(f.channels.channel("warn").unwrap().fields(), Fields::FILE);
    }

    #[test]
    fn prefix_toggle_keeps_other_fields() {
        let f = fixture(Fields::FILE);
        f.channels.with_prefix(true);
        for name in ["info", "warn", "error"] {
            let channel = f.channels.channel(name).unwrap();
            assert_eq!(channel.fields(), Fields::FILE | Fields::LEVEL);
        }

        f.channels.set_fields(Fields::LEVEL);
        f.channels.write("error", "tagged").unwrap();
        f.channels.with_prefix(false);
        f.channels.write("error", "untagged").unwrap();
        assert_eq!(f.error.lines(), vec!["[ERROR] tagged", "untagged"]);
    }

    #[test]
    fn channel_handles_write_directly() {
        let f = fixture(Fields::LEVEL);
        let warn = f.channels.channel("warn").unwrap();
        assert_eq!(warn.name(), "warn");
        assert_eq!(warn.level(), &Level::WARNING);
        warn.write(format_args!("{} items left", 3)).unwrap();
        assert_eq!(f.warn.contents(), "[WARNING] 3 items left\n");

        // handles follow later rebinding
        f.channels.set_threshold(Level::ERROR);
        assert!(!warn.is_live());
        warn.write("gone").unwrap();
        assert_eq!(f.warn.contents(), "[WARNING] 3 items left\n");
    }

    #[test]
    fn standard_channels() {
        let channels = Channels::standard();
        let mut names = channels.names().collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(names, vec!["debug", "error", "info", "warn"]);
        assert_eq!(channels.threshold(), Level::INFO);
        assert!(!channels.channel("debug").unwrap().is_live());
        assert!(channels.channel("info").unwrap().is_live());
        assert_eq!(channels.channel("error").unwrap().fields(), Fields::ALL);
    }

    #[test]
    fn failing_message_is_returned_and_not_written() {
        struct Broken;

        impl fmt::Display for Broken {
            fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let f = fixture(Fields::LEVEL);
        let err = f.channels.write("error", Broken).unwrap_err();
        assert_eq!(err.message(), "failed to perform format");
        assert!(f.error.is_empty());
    }

    #[test]
    fn reconfiguring_inside_a_message_is_skipped() {
        struct Reconfigure<'a>(&'a Channels);

        impl fmt::Display for Reconfigure<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.set_threshold(Level::ERROR);
                self.0.set_sinks("warn", vec![]);
                self.0.set_sink("audit", Capture::default());
                self.0.set_fields(Fields::ALL);
                self.0.set_channel_fields("info", Fields::ALL);
                self.0.with_prefix(true);
                let _ = self.0.write("info", "nested");
                assert!(self.0.flush().is_ok());
                f.write_str("reconfigured")
            }
        }

        let f = fixture(Fields::NONE);
        f.channels.write("warn", Reconfigure(&f.channels)).unwrap();
        assert_eq!(f.warn.contents(), "reconfigured\n");
        assert!(f.info.is_empty());
        assert_eq!(f.channels.threshold(), Level::INFO);
        assert_eq!(f.channels.channel("info").unwrap().fields(), Fields::NONE);
    }
}
