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
use std::io;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Error;
use crate::sink::Sink;

/// A sink over any [`io::Write`], such as an opened file or a socket.
///
/// Opening, rotating, and closing the underlying writer is up to the caller. Each entry is
/// written with a single `write_all` under an internal lock.
///
/// # Examples
///
/// ```
/// use mlog::sink::Sink;
/// use mlog::sink::Writer;
///
/// let sink = Writer::new(Vec::new());
/// sink.write(b"hello\n").unwrap();
/// assert_eq!(sink.into_inner(), b"hello\n");
/// ```
pub struct Writer<W> {
    inner: Mutex<W>,
}

impl<W> Writer<W>
where
    W: io::Write + Send + 'static,
{
    /// Wrap `writer` as a sink.
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer").finish_non_exhaustive()
    }
}

impl<W> Sink for Writer<W>
where
    W: io::Write + Send + 'static,
{
    fn write(&self, bytes: &[u8]) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.write_all(bytes).map_err(Error::from_io_error)
    }

    fn flush(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.flush().map_err(Error::from_io_error)
    }
}
