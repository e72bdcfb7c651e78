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

//! Layout of log entries.
//!
//! Output format, with every field enabled:
//!
//! ```text
//! [WARNING] 2024/08/11 14:44:57.172105 orders.rs:513: Non-existent inventory applied to order
//! ```
//!
//! Each field block, including its trailing separator, is left out when its flag is unset.

use std::fmt;
use std::ops::BitOr;
use std::ops::BitOrAssign;

mod header;

pub use self::header::basename;
pub use self::header::format_entry;
pub use self::header::format_header;
pub use self::header::write_decimal;

/// Optional fields prefixed to every log entry.
///
/// # Examples
///
/// ```
/// use mlog::Fields;
///
/// let fields = Fields::LEVEL | Fields::FILE;
/// assert!(fields.contains(Fields::LEVEL));
/// assert!(!fields.contains(Fields::DATE));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct Fields(u8);

impl Fields {
    /// No field at all, only the message.
    pub const NONE: Fields = Fields(0);
    /// Date and time in UTC: `2009/01/23 01:23:45.123456`.
    pub const DATE: Fields = Fields(1 << 0);
    /// File name and line number: `example.rs:36`.
    pub const FILE: Fields = Fields(1 << 1);
    /// Level tag: `[INFO]`.
    pub const LEVEL: Fields = Fields(1 << 2);
    /// Every field.
    pub const ALL: Fields = Fields(Self::DATE.0 | Self::FILE.0 | Self::LEVEL.0);

    /// Create a field set from its bit representation, dropping unknown bits.
    pub const fn from_bits(bits: u8) -> Fields {
        Fields(bits & Self::ALL.0)
    }

    /// Return the bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Return whether all fields in `other` are set.
    pub const fn contains(self, other: Fields) -> bool {
        self.0 & other.0 == other.0
    }

    /// Return whether no field is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set the fields in `other`.
    pub fn insert(&mut self, other: Fields) {
        self.0 |= other.0;
    }

    /// Clear the fields in `other`.
    pub fn remove(&mut self, other: Fields) {
        self.0 &= !other.0;
    }

    /// Set or clear the fields in `other`.
    pub fn set(&mut self, other: Fields, enabled: bool) {
        if enabled {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl From<u8> for Fields {
    fn from(bits: u8) -> Self {
        Fields::from_bits(bits)
    }
}

impl From<Fields> for u8 {
    fn from(fields: Fields) -> Self {
        fields.bits()
    }
}

impl BitOr for Fields {
    type Output = Fields;

    fn bitor(self, rhs: Fields) -> Fields {
        Fields(self.0 | rhs.0)
    }
}

impl BitOrAssign for Fields {
    fn bitor_assign(&mut self, rhs: Fields) {
        self.insert(rhs);
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }

        let mut first = true;
        for (name, field) in [
            ("LEVEL", Fields::LEVEL),
            ("DATE", Fields::DATE),
            ("FILE", Fields::FILE),
        ] {
            if self.contains(field) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
