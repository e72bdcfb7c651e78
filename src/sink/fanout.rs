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

use crate::Error;
use crate::sink::Sink;

/// A sink that broadcasts every entry to several sinks.
///
/// Each entry is offered to every sink even when an earlier one fails; the first failure is
/// returned.
///
/// # Examples
///
/// ```
/// use mlog::sink::Capture;
/// use mlog::sink::FanOut;
/// use mlog::sink::Sink;
///
/// let first = Capture::default();
/// let second = Capture::default();
/// let fanout = FanOut::default().with(first.clone()).with(second.clone());
///
/// fanout.write(b"hello\n").unwrap();
/// assert_eq!(first.contents(), "hello\n");
/// assert_eq!(second.contents(), "hello\n");
/// ```
#[derive(Debug, Default)]
pub struct FanOut {
    sinks: Vec<Box<dyn Sink>>,
}

impl FanOut {
    /// Create a fan-out sink over `sinks`.
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// Add one more sink.
    pub fn with(mut self, sink: impl Into<Box<dyn Sink>>) -> Self {
        self.sinks.push(sink.into());
        self
    }

    /// Return the number of sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Return whether there is no sink.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for FanOut {
    fn write(&self, bytes: &[u8]) -> Result<(), Error> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.write(bytes) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&self) -> Result<(), Error> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.flush() {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
