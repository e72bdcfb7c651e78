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

use std::sync::OnceLock;

use crate::Error;
use crate::Fields;
use crate::Logger;
use crate::sink::Stdout;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Return the process-wide logger used by the crate-level functions.
///
/// Unless [`set_default_logger`] ran first, this is a logger over the standard levels writing
/// every field to stdout.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| Logger::new(Stdout::default(), Fields::ALL))
}

/// Install `logger` as the process-wide logger.
///
/// This should be called early in the execution of a program, before anything is logged through
/// the crate-level functions. The installed logger stays reconfigurable through its setters.
///
/// # Errors
///
/// Return an error if the default logger has already been set up, either by a previous call or
/// by a first use of [`default_logger`].
pub fn set_default_logger(logger: Logger) -> Result<(), Error> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| Error::new("mlog default logger has been already set up"))
}
