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
use crate::LoggerBuilder;
use crate::guard::EmitGuard;
use crate::layout::format_entry;
use crate::sink;
use crate::sink::Sink;

/// A leveled logger writing formatted entries to a sink.
///
/// All state lives behind one lock: an entry is formatted and written while the lock is held,
/// so concurrent entries never interleave and setters never race with an entry in flight.
///
/// A message's `Display` impl runs under that lock. While it runs, entries it logs are dropped,
/// setters are skipped, [`enabled`](Logger::enabled) returns `false` and
/// [`flush`](Logger::flush) does nothing. [`threshold`](Logger::threshold) and
/// [`fields`](Logger::fields) must not be called on the emitting logger from there: they wait
/// for the lock held by the entry.
///
/// # Examples
///
/// ```
/// use mlog::Fields;
/// use mlog::Level;
/// use mlog::Logger;
/// use mlog::sink::Capture;
///
/// let capture = Capture::default();
/// let logger = Logger::new(capture.clone(), Fields::LEVEL);
///
/// logger.in_testing("dropped").unwrap();
/// logger.set_threshold(Level::DEBUG);
/// logger.in_testing("kept").unwrap();
/// logger.page_me_now(format_args!("disk {} is full", "/dev/sda1")).unwrap();
///
/// assert_eq!(capture.contents(), "[DEBUG] kept\n[ERROR] disk /dev/sda1 is full\n");
/// ```
#[derive(Debug)]
pub struct Logger {
    registry: Arc<LevelRegistry>,
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    threshold: Level,
    fields: Fields,
    sink: Arc<dyn Sink>,
    buffer: Vec<u8>,
}

impl Logger {
    /// Create a logger over the [standard](LevelRegistry::standard) levels, starting at the
    /// `INFO` threshold.
    pub fn new(sink: impl Into<Box<dyn Sink>>, fields: Fields) -> Logger {
        let registry = LevelRegistry::standard();
        let threshold = registry.default_threshold().clone();
        Logger::from_parts(registry, threshold, fields, Arc::from(sink.into()))
    }

    /// Create a new [`LoggerBuilder`] for a logger over any registry.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(super) fn from_parts(
        registry: Arc<LevelRegistry>,
        threshold: Level,
        fields: Fields,
        sink: Arc<dyn Sink>,
    ) -> Logger {
        Logger {
            registry,
            state: Mutex::new(State {
                threshold,
                fields,
                sink,
                buffer: Vec::with_capacity(256),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The registry ordering this logger's levels.
    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    /// The current threshold.
    pub fn threshold(&self) -> Level {
        self.lock().threshold.clone()
    }

    /// The fields currently prefixed to each entry.
    pub fn fields(&self) -> Fields {
        self.lock().fields
    }

    /// Set the least severe level that will be emitted.
    ///
    /// A level missing from the registry is ignored and the previous threshold is kept.
    pub fn set_threshold(&self, level: Level) {
        if EmitGuard::is_active() || !self.registry.contains(&level) {
            return;
        }
        self.lock().threshold = level;
    }

    /// Set which fields are prefixed to each entry.
    pub fn set_fields(&self, fields: Fields) {
        if EmitGuard::is_active() {
            return;
        }
        self.lock().fields = fields;
    }

    /// Replace the destination of this logger.
    #[track_caller]
    pub fn set_sink(&self, sink: impl Into<Box<dyn Sink>>) {
        self.set_sinks(vec![sink.into()]);
    }

    /// Replace the destinations of this logger.
    ///
    /// Several sinks are combined into a [`FanOut`](sink::FanOut). With no sink at all, the
    /// previous destination is kept and a diagnostic is logged to it.
    #[track_caller]
    pub fn set_sinks(&self, sinks: Vec<Box<dyn Sink>>) {
        if EmitGuard::is_active() {
            return;
        }
        let call_site = CallSite::caller();
        let mut state = self.lock();
        match sink::compose(sinks) {
            Some(sink) => state.sink = sink,
            None => {
                let level = self.registry.default_threshold();
                let message = "set_sinks: no destination provided";
                let _ = self.emit_locked(&mut state, level, call_site, &message);
            }
        }
    }

    /// Return whether an entry at `level` would be emitted.
    pub fn enabled(&self, level: &Level) -> bool {
        if EmitGuard::is_active() {
            return false;
        }
        let state = self.lock();
        match (
            self.registry.ordinal(level),
            self.registry.ordinal(&state.threshold),
        ) {
            (Some(requested), Some(threshold)) => requested >= threshold,
            _ => false,
        }
    }

    /// Flush the current destination.
    pub fn flush(&self) -> Result<(), Error> {
        if EmitGuard::is_active() {
            return Ok(());
        }
        let sink = self.lock().sink.clone();
        sink.flush()
    }

    /// Log `message` at `level`.
    ///
    /// A `&str` is written verbatim; use [`format_args!`] or the [`log!`](crate::log!) macro
    /// for formatting. Entries logged while `message` is being formatted are dropped.
    ///
    /// # Errors
    ///
    /// Return an error if the sink fails to write the entry, or if the `Display` impl of
    /// `message` fails. Nothing is written in the latter case.
    #[track_caller]
    pub fn log(&self, level: &Level, message: impl fmt::Display) -> Result<(), Error> {
        self.emit(level, CallSite::caller(), &message)
    }

    /// Log a message "in testing": noisy and verbose output, often during development.
    #[track_caller]
    pub fn in_testing(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.emit(&Level::DEBUG, CallSite::caller(), &message)
    }

    /// Log a message "in production": information needed to debug production issues.
    #[track_caller]
    pub fn in_production(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.emit(&Level::INFO, CallSite::caller(), &message)
    }

    /// Log a message "to investigate later": important events which require special, but not
    /// immediate, attention.
    #[track_caller]
    pub fn to_investigate(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.emit(&Level::WARNING, CallSite::caller(), &message)
    }

    /// Log a message important enough to wake someone up in the middle of the night.
    #[track_caller]
    pub fn page_me_now(&self, message: impl fmt::Display) -> Result<(), Error> {
        self.emit(&Level::ERROR, CallSite::caller(), &message)
    }

    pub(crate) fn emit(
        &self,
        level: &Level,
        call_site: CallSite<'_>,
        message: &dyn fmt::Display,
    ) -> Result<(), Error> {
        let Some(_guard) = EmitGuard::enter() else {
            return Ok(());
        };
        let mut state = self.lock();
        self.emit_locked(&mut state, level, call_site, message)
    }

    fn emit_locked(
        &self,
        state: &mut State,
        level: &Level,
        call_site: CallSite<'_>,
        message: &dyn fmt::Display,
    ) -> Result<(), Error> {
        match (
            self.registry.ordinal(level),
            self.registry.ordinal(&state.threshold),
        ) {
            (Some(requested), Some(threshold)) => {
                if requested < threshold {
                    return Ok(());
                }
            }
            _ => {
                // the diagnostic is best-effort and replaces the entry
                let diagnostic = format!(
                    "invalid log level in comparison: {level} >= {}\n",
                    state.threshold
                );
                let _ = state.sink.write(diagnostic.as_bytes());
                return Ok(());
            }
        }

        let State {
            fields,
            sink,
            buffer,
            ..
        } = state;
        format_entry(buffer, *fields, level, call_site, message)?;
        sink.write(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Capture;

    fn capturing(fields: Fields) -> (Logger, Capture) {
        let capture = Capture::default();
        (Logger::new(capture.clone(), fields), capture)
    }

    #[derive(Debug)]
    struct Failing;

    impl Sink for Failing {
        fn write(&self, _: &[u8]) -> Result<(), Error> {
            Err(Error::new("sink is gone"))
        }
    }

    #[test]
    fn defaults() {
        let (logger, _) = capturing(Fields::ALL);
        assert_eq!(logger.threshold(), Level::INFO);
        assert_eq!(logger.fields(), Fields::ALL);
        assert_eq!(logger.registry().levels().len(), 4);
    }

    #[test]
    fn threshold_gates_every_pair_of_levels() {
        let registry = LevelRegistry::standard();
        let levels = registry.levels().cloned().collect::<Vec<_>>();
        for (t, threshold) in levels.iter().enumerate() {
            let (logger, capture) = capturing(Fields::NONE);
            logger.set_threshold(threshold.clone());
            for (r, requested) in levels.iter().enumerate() {
                capture.clear();
                logger.log(requested, requested.name()).unwrap();
                let emitted = !capture.is_empty();
                assert_eq!(emitted, r >= t, "{requested} at threshold {threshold}");
                assert_eq!(logger.enabled(requested), r >= t);
            }
        }
    }

    #[test]
    fn unknown_threshold_is_ignored() {
        let (logger, _) = capturing(Fields::NONE);
        logger.set_threshold(Level::WARNING);
        logger.set_threshold(Level::new("whatever"));
        assert_eq!(logger.threshold(), Level::WARNING);
        logger.set_threshold(Level::TRACE);
        assert_eq!(logger.threshold(), Level::WARNING);
    }

    #[test]
    fn unknown_level_is_suppressed_with_a_diagnostic() {
        let (logger, capture) = capturing(Fields::ALL);
        logger.log(&Level::TRACE, "secret").unwrap();
        assert_eq!(
            capture.contents(),
            "invalid log level in comparison: TRACE >= INFO\n"
        );
        assert!(!logger.enabled(&Level::TRACE));
    }

    #[test]
    fn bare_message() {
        let (logger, capture) = capturing(Fields::NONE);
        logger.in_production("debug").unwrap();
        assert_eq!(capture.contents(), "debug\n");
    }

    #[test]
    fn terminated_message_is_not_doubled() {
        let (logger, capture) = capturing(Fields::NONE);
        logger.in_production("debug\n").unwrap();
        assert_eq!(capture.contents(), "debug\n");
    }

    #[test]
    fn verbatim_and_formatted_messages() {
        let (logger, capture) = capturing(Fields::NONE);
        logger.in_production("100% {literal}").unwrap();
        logger
            .in_production(format_args!("example: {}", 42))
            .unwrap();
        assert_eq!(capture.lines(), vec!["100% {literal}", "example: 42"]);
    }

    #[test]
    fn level_named_methods_tag_their_level() {
        let (logger, capture) = capturing(Fields::LEVEL);
        logger.set_threshold(Level::DEBUG);
        logger.in_testing("a").unwrap();
        logger.in_production("b").unwrap();
        logger.to_investigate("c").unwrap();
        logger.page_me_now("d").unwrap();
        assert_eq!(
            capture.lines(),
            vec!["[DEBUG] a", "[INFO] b", "[WARNING] c", "[ERROR] d"]
        );
    }

    #[test]
    fn caller_location_names_this_file() {
        let (logger, capture) = capturing(Fields::FILE);
        let line = line!() + 1;
        logger.to_investigate("here").unwrap();
        assert_eq!(capture.contents(), format!("logger.rs:{line}: here\n"));
    }

    #[test]
    fn full_header_layout() {
        let (logger, capture) = capturing(Fields::ALL);
        logger.to_investigate("message").unwrap();

        let entry = capture.contents();
        let rest = entry.strip_prefix("[WARNING] ").unwrap();
        let (date, rest) = rest.split_at(27);
        let bytes = date.as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            match i {
                4 | 7 => assert_eq!(*b, b'/'),
                10 | 26 => assert_eq!(*b, b' '),
                13 | 16 => assert_eq!(*b, b':'),
                19 => assert_eq!(*b, b'.'),
                _ => assert!(b.is_ascii_digit(), "{date:?}"),
            }
        }
        assert!(rest.starts_with("logger.rs:"));
        assert!(rest.ends_with(": message\n"));
    }

    #[test]
    fn fields_can_change_at_runtime() {
        let (logger, capture) = capturing(Fields::NONE);
        logger.in_production("plain").unwrap();
        logger.set_fields(Fields::LEVEL);
        logger.in_production("tagged").unwrap();
        assert_eq!(capture.lines(), vec!["plain", "[INFO] tagged"]);
    }

    #[test]
    fn zero_sinks_keep_the_previous_one() {
        let (logger, capture) = capturing(Fields::NONE);
        logger.set_sinks(vec![]);
        logger.in_production("still here").unwrap();
        assert_eq!(
            capture.lines(),
            vec!["set_sinks: no destination provided", "still here"]
        );
    }

    #[test]
    fn several_sinks_receive_the_same_entry() {
        let (logger, first) = capturing(Fields::LEVEL);
        let second = Capture::default();
        logger.set_sinks(vec![first.clone().into(), second.clone().into()]);
        logger.in_production("both").unwrap();
        assert_eq!(first.contents(), "[INFO] both\n");
        assert_eq!(second.contents(), "[INFO] both\n");
    }

    #[test]
    fn replacing_the_sink() {
        let (logger, old) = capturing(Fields::NONE);
        let new = Capture::default();
        logger.set_sink(new.clone());
        logger.in_production("moved").unwrap();
        assert!(old.is_empty());
        assert_eq!(new.contents(), "moved\n");
    }

    #[test]
    fn sink_failures_reach_the_caller() {
        let logger = Logger::new(Failing, Fields::NONE);
        let err = logger.in_production("lost").unwrap_err();
        assert_eq!(err.message(), "sink is gone");
        // suppressed entries never touch the sink
        assert!(logger.in_testing("quiet").is_ok());
    }

    #[test]
    fn entries_logged_while_formatting_are_dropped() {
        struct Chatty<'a>(&'a Logger);

        impl fmt::Display for Chatty<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let _ = self.0.in_production("nested");
                f.write_str("outer")
            }
        }

        let (logger, capture) = capturing(Fields::NONE);
        logger.in_production(Chatty(&logger)).unwrap();
        logger.in_production("after").unwrap();
        assert_eq!(capture.lines(), vec!["outer", "after"]);
    }

    #[derive(Debug)]
    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn failing_message_is_returned_and_not_written() {
        let (logger, capture) = capturing(Fields::LEVEL);
        let err = logger.in_production(Broken).unwrap_err();
        assert_eq!(err.message(), "failed to perform format");
        assert!(capture.is_empty());

        // the logger stays usable
        logger.in_production("next").unwrap();
        assert_eq!(capture.contents(), "[INFO] next\n");
    }

    #[test]
    fn setters_inside_a_message_are_skipped() {
        struct Reconfigure<'a>(&'a Logger, Capture);

        impl fmt::Display for Reconfigure<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.set_sinks(vec![]);
                self.0.set_sink(self.1.clone());
                self.0.set_threshold(Level::ERROR);
                self.0.set_fields(Fields::ALL);
                assert!(!self.0.enabled(&Level::ERROR));
                assert!(self.0.flush().is_ok());
                f.write_str("reconfigured")
            }
        }

        let (logger, capture) = capturing(Fields::NONE);
        let other = Capture::default();
        logger
            .in_production(Reconfigure(&logger, other.clone()))
            .unwrap();
        assert_eq!(capture.contents(), "reconfigured\n");
        assert!(other.is_empty());
        assert_eq!(logger.threshold(), Level::INFO);
        assert_eq!(logger.fields(), Fields::NONE);
    }
}
