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

//! Destinations for formatted log entries.

use std::fmt;
use std::sync::Arc;

use crate::Error;

mod capture;
mod discard;
mod fanout;
mod stdio;
mod writer;

pub use self::capture::Capture;
pub use self::discard::Discard;
pub use self::fanout::FanOut;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;
pub use self::writer::Writer;

/// A destination that accepts complete log entries.
///
/// Every call to [`Sink::write`] carries exactly one entry, including its trailing newline.
/// Implementations shared between threads must keep each write contiguous.
pub trait Sink: fmt::Debug + Send + Sync + 'static {
    /// Write one entry to the destination.
    fn write(&self, bytes: &[u8]) -> Result<(), Error>;

    /// Flush any buffered entries.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Sink> From<T> for Box<dyn Sink> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// Combine sinks into one: `None` when there are none, the sink itself when there is one, and a
/// [`FanOut`] otherwise.
pub(crate) fn compose(mut sinks: Vec<Box<dyn Sink>>) -> Option<Arc<dyn Sink>> {
    match sinks.len() {
        0 => None,
        1 => sinks.pop().map(Arc::from),
        _ => Some(Arc::new(FanOut::new(sinks))),
    }
}
