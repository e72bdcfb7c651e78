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

//! Detect entries emitted while another entry is being formatted on the same thread.
//!
//! A message's `Display` impl runs while the emitting logger or channel holds its lock, so an
//! entry logged from inside it would deadlock. Such nested entries are dropped instead, and
//! setters called from inside it are skipped.

use std::cell::Cell;

thread_local! {
    static EMITTING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as emitting until dropped.
#[derive(Debug)]
pub(crate) struct EmitGuard(());

impl EmitGuard {
    /// Return `None` if the current thread is already emitting an entry.
    pub(crate) fn enter() -> Option<EmitGuard> {
        EMITTING.with(|emitting| {
            if emitting.replace(true) {
                None
            } else {
                Some(EmitGuard(()))
            }
        })
    }

    /// Return whether the current thread is emitting an entry.
    pub(crate) fn is_active() -> bool {
        EMITTING.with(Cell::get)
    }
}

impl Drop for EmitGuard {
    fn drop(&mut self) {
        EMITTING.with(|emitting| emitting.set(false));
    }
}
