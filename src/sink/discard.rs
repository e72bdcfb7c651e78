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

/// A sink that accepts and drops every entry.
///
/// Channels below the threshold of a [`Channels`](crate::Channels) registry are bound to it.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct Discard {}

impl Sink for Discard {
    #[inline]
    fn write(&self, _: &[u8]) -> Result<(), Error> {
        Ok(())
    }
}
