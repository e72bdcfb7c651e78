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

//! Resolve the source location of a logging call.
//!
//! Every public entry point that ends up writing an entry is annotated with `#[track_caller]`,
//! so [`CallSite::caller`] sees through the crate's own frames and reports the user's call. A
//! new public wrapper must carry the attribute as well, or entries will name the wrapper.

use std::panic::Location;

use crate::layout::basename;

/// The file and line a log entry was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite<'a> {
    file: &'a str,
    line: u32,
}

impl CallSite<'static> {
    /// The location rendered when the call site cannot be resolved.
    pub const UNKNOWN: CallSite<'static> = CallSite {
        file: "???",
        line: 0,
    };

    /// Resolve the call site of the outermost `#[track_caller]` frame.
    ///
    /// ```
    /// use mlog::CallSite;
    ///
    /// let site = CallSite::caller();
    /// assert_eq!(site.line(), line!() - 1);
    /// assert!(site.is_known());
    /// ```
    #[track_caller]
    pub fn caller() -> CallSite<'static> {
        Self::from_location(Location::caller())
    }

    /// Create a call site from a captured [`Location`].
    pub fn from_location(location: &'static Location<'static>) -> CallSite<'static> {
        CallSite {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl<'a> CallSite<'a> {
    /// Create a call site from a file path and a line number.
    pub fn new(file: &'a str, line: u32) -> CallSite<'a> {
        CallSite { file, line }
    }

    /// Create a call site from data supplied by another facade.
    ///
    /// Missing or empty parts degrade to [`CallSite::UNKNOWN`].
    pub fn from_parts(file: Option<&'a str>, line: Option<u32>) -> CallSite<'a> {
        match (file, line) {
            (Some(file), Some(line)) if !file.is_empty() && line > 0 => CallSite { file, line },
            _ => CallSite::UNKNOWN,
        }
    }

    /// The source path as reported by the compiler.
    pub fn file(&self) -> &'a str {
        self.file
    }

    /// The last segment of [`CallSite::file`].
    pub fn basename(&self) -> &'a str {
        basename(self.file)
    }

    /// The 1-based line, or `0` when unknown.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Return `false` for [`CallSite::UNKNOWN`].
    pub fn is_known(&self) -> bool {
        *self != CallSite::UNKNOWN
    }
}
