// This file is part of taprun, a TAP-driven test harness.
// Copyright (C) 2026 the taprun developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Harness-wide runtime toggles
//!
//! All mutable harness configuration lives in an explicit [`Context`]
//! value that is threaded through the line reader and the interpreter.
//! Some fields are set from the command line, some are flipped
//! mid-stream by pragmas; the pragma registry is responsible for
//! restoring pragma-modified fields between testsets.

/// Default number of one-second retries before a silent non-blocking
/// pipe is treated as closed
pub const DEFAULT_BLOCKING_TIME: u32 = 60;

/// Mutable harness configuration
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Context {
    /// Reject lax TAP output as an error (the `strict` pragma)
    pub strict: bool,

    /// Treat the child pipe as blocking, retrying a would-block read
    /// indefinitely (the `readblock` pragma)
    pub readblock: bool,

    /// Retry budget for would-block reads when `readblock` is off
    pub blocking_time: u32,

    /// Merge the child's stderr into the output pipe instead of
    /// discarding it
    pub capture_stderr: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            strict: false,
            readblock: false,
            blocking_time: DEFAULT_BLOCKING_TIME,
            capture_stderr: false,
        }
    }
}
