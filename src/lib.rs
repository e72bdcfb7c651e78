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

//! A small leveled logging core.
//!
//! # Overview
//!
//! mlog writes one line per entry, prefixed with any combination of a severity tag, a UTC
//! timestamp and the source location of the call:
//!
//! ```text
//! [WARNING] 2024/08/11 14:44:57.172105 orders.rs:513: Non-existent inventory applied to order
//! ```
//!
//! Severities are ordered by a [`LevelRegistry`]. Two ways of filtering them are provided:
//!
//! * A [`Logger`] compares each entry's level with its threshold when the entry is logged.
//! * [`Channels`] bind a named channel to every level and swap the channels below the threshold
//!   to a discard sink whenever the threshold changes, so writes never compare levels.
//!
//! # Examples
//!
//! Log through the process-wide default logger:
//!
//! ```
//! mlog::in_production("service started").unwrap();
//! mlog::to_investigate!("{} retries left", 2).unwrap();
//! ```
//!
//! Configure a dedicated logger:
//!
//! ```
//! use mlog::Fields;
//! use mlog::Level;
//! use mlog::Logger;
//! use mlog::sink;
//!
//! let logger = Logger::builder()
//!     .threshold(Level::WARNING)
//!     .fields(Fields::LEVEL | Fields::FILE)
//!     .sink(sink::Stderr::default())
//!     .build()
//!     .unwrap();
//!
//! logger.in_production("dropped").unwrap();
//! logger.page_me_now("written to stderr").unwrap();
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use std::fmt;

pub mod layout;
pub mod sink;

mod caller;
mod channel;
mod error;
mod guard;
mod level;
mod logger;
mod macros;

pub use self::caller::CallSite;
pub use self::channel::Channel;
pub use self::channel::Channels;
pub use self::channel::ChannelsBuilder;
pub use self::error::Error;
pub use self::layout::Fields;
pub use self::level::Level;
pub use self::level::LevelRegistry;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::logger::default_logger;
pub use self::logger::set_default_logger;
pub use self::sink::Sink;

/// Bridge mlog with other logging frameworks.
pub mod bridge {
    /// Bridge mlog with [`log`].
    ///
    /// [`log`]: https://docs.rs/log/
    #[cfg(feature = "bridge-log")]
    pub mod log;
}

/// The threshold of the [default logger](default_logger).
pub fn threshold() -> Level {
    default_logger().threshold()
}

/// The fields of the [default logger](default_logger).
pub fn fields() -> Fields {
    default_logger().fields()
}

/// See [`Logger::set_threshold`].
pub fn set_threshold(level: Level) {
    default_logger().set_threshold(level);
}

/// See [`Logger::set_fields`].
pub fn set_fields(fields: Fields) {
    default_logger().set_fields(fields);
}

/// See [`Logger::set_sink`].
#[track_caller]
pub fn set_sink(sink: impl Into<Box<dyn Sink>>) {
    default_logger().set_sink(sink);
}

/// See [`Logger::set_sinks`].
#[track_caller]
pub fn set_sinks(sinks: Vec<Box<dyn Sink>>) {
    default_logger().set_sinks(sinks);
}

/// Log `message` at `level` with the [default logger](default_logger).
#[track_caller]
pub fn log(level: &Level, message: impl fmt::Display) -> Result<(), Error> {
    default_logger().log(level, message)
}

/// See [`Logger::in_testing`].
#[track_caller]
pub fn in_testing(message: impl fmt::Display) -> Result<(), Error> {
    default_logger().in_testing(message)
}

/// See [`Logger::in_production`].
#[track_caller]
pub fn in_production(message: impl fmt::Display) -> Result<(), Error> {
    default_logger().in_production(message)
}

/// See [`Logger::to_investigate`].
#[track_caller]
pub fn to_investigate(message: impl fmt::Display) -> Result<(), Error> {
    default_logger().to_investigate(message)
}

/// See [`Logger::page_me_now`].
#[track_caller]
pub fn page_me_now(message: impl fmt::Display) -> Result<(), Error> {
    default_logger().page_me_now(message)
}

/// Flush the sink of the [default logger](default_logger).
pub fn flush() -> Result<(), Error> {
    default_logger().flush()
}
