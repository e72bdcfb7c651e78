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

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::CallSite;
use crate::Error;
use crate::Fields;
use crate::Level;

/// Append `value` in decimal ASCII, left-padded with zeros to `width` digits.
///
/// A `width` of 0 or 1 disables padding. Widths beyond 20 digits are clamped.
///
/// ```
/// let mut buf = Vec::new();
/// mlog::layout::write_decimal(&mut buf, 7, 2);
/// buf.push(b' ');
/// mlog::layout::write_decimal(&mut buf, 513, 0);
/// assert_eq!(buf, b"07 513");
/// ```
pub fn write_decimal(buf: &mut Vec<u8>, value: u64, width: usize) {
    let mut digits = [0u8; 20];
    let mut pos = digits.len();
    let mut value = value;
    let mut width = width.min(digits.len());

    loop {
        pos -= 1;
        digits[pos] = b'0' + (value % 10) as u8;
        value /= 10;
        width = width.saturating_sub(1);
        if value == 0 && width == 0 {
            break;
        }
    }

    buf.extend_from_slice(&digits[pos..]);
}

/// Return the last segment of a `/` or `\` separated path.
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Append the enabled header fields for one entry.
///
/// `time` is only read when [`Fields::DATE`] is set.
pub fn format_header(
    buf: &mut Vec<u8>,
    fields: Fields,
    level: &Level,
    time: Timestamp,
    call_site: CallSite<'_>,
) {
    if fields.contains(Fields::LEVEL) {
        buf.push(b'[');
        buf.extend_from_slice(level.name().as_bytes());
        buf.extend_from_slice(b"] ");
    }

    if fields.contains(Fields::DATE) {
        let dt = TimeZone::UTC.to_datetime(time);
        write_decimal(buf, u64::from(dt.year().unsigned_abs()), 4);
        buf.push(b'/');
        write_decimal(buf, u64::from(dt.month().unsigned_abs()), 2);
        buf.push(b'/');
        write_decimal(buf, u64::from(dt.day().unsigned_abs()), 2);
        buf.push(b' ');
        write_decimal(buf, u64::from(dt.hour().unsigned_abs()), 2);
        buf.push(b':');
        write_decimal(buf, u64::from(dt.minute().unsigned_abs()), 2);
        buf.push(b':');
        write_decimal(buf, u64::from(dt.second().unsigned_abs()), 2);
        buf.push(b'.');
        write_decimal(buf, u64::from(dt.subsec_nanosecond().unsigned_abs() / 1_000), 6);
        buf.push(b' ');
    }

    if fields.contains(Fields::FILE) {
        buf.extend_from_slice(call_site.basename().as_bytes());
        buf.push(b':');
        write_decimal(buf, u64::from(call_site.line()), 0);
        buf.extend_from_slice(b": ");
    }
}

// Renders through `fmt::Write`, so a failing `Display` impl surfaces as `fmt::Error`.
struct Utf8Buf<'a>(&'a mut Vec<u8>);

impl fmt::Write for Utf8Buf<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Clear `buf` and render a complete entry into it: header, message, and exactly one trailing
/// newline.
///
/// # Errors
///
/// Return an error if the `Display` impl of `message` fails. `buf` then holds a partial entry
/// and must not be written.
pub fn format_entry(
    buf: &mut Vec<u8>,
    fields: Fields,
    level: &Level,
    call_site: CallSite<'_>,
    message: &dyn fmt::Display,
) -> Result<(), Error> {
    let time = if fields.contains(Fields::DATE) {
        Timestamp::now()
    } else {
        Timestamp::UNIX_EPOCH
    };

    buf.clear();
    format_header(buf, fields, level, time, call_site);

    let start = buf.len();
    fmt::write(&mut Utf8Buf(&mut *buf), format_args!("{message}"))
        .map_err(Error::from_fmt_error)?;
    if buf.len() == start || buf.last() != Some(&b'\n') {
        buf.push(b'\n');
    }
    Ok(())
}
