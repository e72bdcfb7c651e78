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

use std::io::Write;

use crate::CallSite;
use crate::Error;
use crate::Level;
use crate::LevelRegistry;
use crate::Logger;
use crate::default_logger;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        log::Log::enabled(default_logger(), metadata)
    }

    fn log(&self, record: &log::Record) {
        log::Log::log(default_logger(), record);
    }

    fn flush(&self) {
        log::Log::flush(default_logger());
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from log
/// crate will be forwarded to the [default logger](crate::default_logger).
///
/// This function will set the global maximum log level to `Trace`; records are then gated by
/// the default logger's threshold. To override this, call [`log::set_max_level`] after this
/// function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// mlog::bridge::log::try_setup_log_crate().unwrap();
/// log::info!("forwarded to mlog");
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "mlog::bridge::log::setup_log_crate must be called before the log crate global logger initialized",
    )
}

// Names tried in order; the first one registered wins.
fn candidates(level: log::Level) -> &'static [&'static str] {
    match level {
        log::Level::Trace => &["TRACE", "DEBUG"],
        log::Level::Debug => &["DEBUG"],
        log::Level::Info => &["INFO"],
        log::Level::Warn => &["WARNING", "WARN"],
        log::Level::Error => &["ERROR"],
    }
}

/// Map a `log` crate level onto a level of `registry`.
///
/// Return `None` if none of the matching names is registered.
///
/// ```
/// use mlog::Level;
/// use mlog::LevelRegistry;
/// use mlog::bridge::log::map_level;
///
/// let registry = LevelRegistry::standard();
/// assert_eq!(map_level(&registry, log::Level::Trace), Some(Level::DEBUG));
/// assert_eq!(map_level(&registry, log::Level::Warn), Some(Level::WARNING));
/// ```
pub fn map_level(registry: &LevelRegistry, level: log::Level) -> Option<Level> {
    candidates(level)
        .iter()
        .map(|&name| Level::new_static(name))
        .find(|level| registry.contains(level))
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        map_level(self.registry(), metadata.level()).is_some_and(|level| self.enabled(&level))
    }

    fn log(&self, record: &log::Record) {
        // an unmapped level goes through the gate to report the mismatch
        let level = map_level(self.registry(), record.level())
            .unwrap_or_else(|| Level::new_static(candidates(record.level())[0]));
        let call_site = CallSite::from_parts(record.file(), record.line());
        if let Err(err) = self.emit(&level, call_site, record.args()) {
            handle_log_error(record, err);
        }
    }

    fn flush(&self) {
        if let Err(err) = Logger::flush(self) {
            let _ = writeln!(std::io::stderr(), "Error flushing mlog logger: {err:?}");
        }
    }
}

// The `log` facade has nowhere to return errors to; stderr is the last resort.
fn handle_log_error(record: &log::Record, error: Error) {
    let _ = write!(
        std::io::stderr(),
        r###"
Error perform logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error:?}
"###,
        args = record.args(),
        record = record,
        error = error,
    );
}
