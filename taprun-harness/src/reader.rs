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

//! Line-by-line reader for the child output pipe
//!
//! The descriptor handed to the reader is expected to be non-blocking.
//! A would-block read is retried after a one-second sleep, up to the
//! [`blocking_time`](crate::context::Context::blocking_time) budget;
//! once the budget is exhausted the stream is treated as closed. The
//! `readblock` pragma lifts the budget so the reader waits for the
//! child indefinitely.

use crate::context::Context;
use nix::errno::Errno;
use std::os::fd::OwnedFd;
use std::slice::from_mut;
use std::thread::sleep;
use std::time::Duration;

/// Longest line the reader accumulates before handing back a chunk
pub const MAX_LINE: usize = 1024;

/// One unit of input from the child
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Read {
    /// A line; more input may follow.
    ///
    /// The line keeps its trailing newline. A line that hit the length
    /// bound is returned without one, which marks it as truncated for
    /// the interpreter.
    Line(String),

    /// End of the stream, from a clean EOF or an exhausted retry
    /// budget. The string holds any partial trailing line, without a
    /// newline.
    Eof(String),
}

/// Reader that owns the child pipe until the stream ends
///
/// Dropping the reader closes the descriptor.
#[derive(Debug)]
#[must_use = "a LineReader does nothing until next_line is called"]
pub struct LineReader {
    fd: OwnedFd,
    limit: usize,
}

impl LineReader {
    /// Creates a reader with the default line length bound.
    pub fn new(fd: OwnedFd) -> Self {
        Self::with_limit(fd, MAX_LINE)
    }

    /// Creates a reader with a custom line length bound.
    pub fn with_limit(fd: OwnedFd, limit: usize) -> Self {
        debug_assert!(limit >= 2);
        LineReader { fd, limit }
    }

    /// Reads the next newline-terminated line.
    ///
    /// Bytes are read one at a time so the reader never consumes past a
    /// newline. Interrupted reads are retried; a would-block read
    /// sleeps and retries as described in the module documentation, and
    /// any successfully read byte resets the retry count. Other read
    /// errors are unrecoverable and returned as-is.
    pub fn next_line(&mut self, context: &Context) -> Result<Read, Errno> {
        let mut bytes = Vec::new();
        let mut retries = 0;
        loop {
            // One byte is reserved, as for a C string terminator.
            if bytes.len() >= self.limit - 1 {
                return Ok(Read::Line(into_lossy_string(bytes)));
            }

            let mut byte = 0;
            match nix::unistd::read(&self.fd, from_mut(&mut byte)) {
                Ok(0) => return Ok(Read::Eof(into_lossy_string(bytes))),
                Ok(_) => {
                    retries = 0;
                    bytes.push(byte);
                    if byte == b'\n' {
                        return Ok(Read::Line(into_lossy_string(bytes)));
                    }
                }
                Err(Errno::EINTR) => {}
                Err(Errno::EAGAIN) => {
                    if !context.readblock {
                        if retries >= context.blocking_time {
                            return Ok(Read::Eof(into_lossy_string(bytes)));
                        }
                        retries += 1;
                    }
                    sleep(Duration::from_secs(1));
                }
                Err(errno) => return Err(errno),
            }
        }
    }
}

fn into_lossy_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::set_nonblocking;
    use assert_matches::assert_matches;
    use nix::unistd::{pipe, write};

    fn reader_for(content: &[u8]) -> LineReader {
        let (read_end, write_end) = pipe().unwrap();
        write(&write_end, content).unwrap();
        LineReader::new(read_end)
    }

    #[test]
    fn lines_then_eof() {
        let context = Context::default();
        let mut reader = reader_for(b"1..2\nok 1\nok 2\n");
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("1..2\n".to_owned())
        );
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("ok 1\n".to_owned())
        );
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("ok 2\n".to_owned())
        );
        assert_eq!(reader.next_line(&context).unwrap(), Read::Eof(String::new()));
    }

    #[test]
    fn partial_trailing_line() {
        let context = Context::default();
        let mut reader = reader_for(b"ok 1\nok 2");
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("ok 1\n".to_owned())
        );
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Eof("ok 2".to_owned())
        );
    }

    #[test]
    fn overlong_line_is_chunked() {
        let context = Context::default();
        let (read_end, write_end) = pipe().unwrap();
        write(&write_end, b"aaaaaaaaaaaaaaaaaaaaok\n").unwrap();
        let mut reader = LineReader::with_limit(read_end, 8);
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("aaaaaaa".to_owned())
        );
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("aaaaaaa".to_owned())
        );
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("aaaaaao".to_owned())
        );
        assert_eq!(
            reader.next_line(&context).unwrap(),
            Read::Line("k\n".to_owned())
        );
    }

    #[test]
    fn exhausted_retry_budget_reads_as_eof() {
        let context = Context {
            blocking_time: 0,
            ..Context::default()
        };
        let (read_end, _write_end) = pipe().unwrap();
        set_nonblocking(&read_end).unwrap();
        let mut reader = LineReader::new(read_end);
        // The write end is still open, so only the exhausted budget can
        // end the read.
        assert_eq!(reader.next_line(&context).unwrap(), Read::Eof(String::new()));
    }

    #[test]
    fn read_error_is_surfaced() {
        let context = Context::default();
        let (read_end, write_end) = pipe().unwrap();
        drop(read_end);
        // A write end is not readable.
        let mut reader = LineReader::new(write_end);
        assert_matches!(reader.next_line(&context), Err(Errno::EBADF));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let context = Context::default();
        let mut reader = reader_for(b"ok \xff\n");
        assert_matches!(reader.next_line(&context).unwrap(), Read::Line(line) => {
            assert_eq!(line, "ok \u{fffd}\n");
        });
    }
}
