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

//! Formatting shorthands for the emission methods.
//!
//! Every macro takes [`format_args!`] style arguments. Without a `logger:` argument the entry
//! goes to the [default logger](crate::default_logger). Each expands to a call returning
//! `Result<(), mlog::Error>`.

/// Log a formatted message at an explicit level.
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
/// mlog::log!(logger: logger, Level::ERROR, "{} of {} replicas down", 2, 3).unwrap();
/// assert_eq!(capture.contents(), "[ERROR] 2 of 3 replicas down\n");
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::Logger::log(&$logger, &$level, ::std::format_args!($($arg)+))
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::Logger::log($crate::default_logger(), &$level, ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at `DEBUG`, see [`Logger::in_testing`](crate::Logger::in_testing).
#[macro_export]
macro_rules! in_testing {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::Logger::in_testing(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::Logger::in_testing($crate::default_logger(), ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at `INFO`, see
/// [`Logger::in_production`](crate::Logger::in_production).
#[macro_export]
macro_rules! in_production {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::Logger::in_production(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::Logger::in_production($crate::default_logger(), ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at `WARNING`, see
/// [`Logger::to_investigate`](crate::Logger::to_investigate).
#[macro_export]
macro_rules! to_investigate {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::Logger::to_investigate(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::Logger::to_investigate($crate::default_logger(), ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message at `ERROR`, see [`Logger::page_me_now`](crate::Logger::page_me_now).
#[macro_export]
macro_rules! page_me_now {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::Logger::page_me_now(&$logger, ::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::Logger::page_me_now($crate::default_logger(), ::std::format_args!($($arg)+))
    };
}
