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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::Error;
use crate::sink::Sink;

/// A sink that keeps every entry in a shared in-memory buffer.
///
/// Clones share the same buffer, so one clone can be handed to a logger while another is used
/// to inspect what was written. Handy in tests.
///
/// # Examples
///
/// ```
/// use mlog::Fields;
/// use mlog::Logger;
/// use mlog::sink::Capture;
///
/// let capture = Capture::default();
/// let logger = Logger::new(capture.clone(), Fields::NONE);
/// logger.in_production("hello").unwrap();
/// assert_eq!(capture.contents(), "hello\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return a copy of the captured bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Return the captured bytes as text, replacing invalid UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Return the captured entries, one per line, without newlines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Return whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Sink for Capture {
    fn write(&self, bytes: &[u8]) -> Result<(), Error> {
        self.lock().extend_from_slice(bytes);
        Ok(())
    }
}
