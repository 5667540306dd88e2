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

//! Verbatim log sink
//!
//! Every line the harness consumes from a child can be echoed to a log
//! sink. Logging is best-effort: write failures are swallowed so that a
//! full disk cannot fail a test run.

use std::fs::{File, OpenOptions};
use std::io::Write;

#[derive(Debug)]
enum Sink {
    Stdout,
    Stderr,
    File(File),
}

/// Best-effort line sink
///
/// Dropping the logger closes a file sink; the special `stdout` and
/// `stderr` sinks borrow the process streams and never close them.
#[derive(Debug)]
pub struct Logger {
    sink: Sink,
}

impl Logger {
    /// Opens a log sink.
    ///
    /// The names `stdout` and `stderr` bind the sink to the
    /// corresponding process stream; any other name is a file path,
    /// truncated or appended to as requested.
    pub fn open(name: &str, append: bool) -> std::io::Result<Logger> {
        let sink = match name {
            "stdout" => Sink::Stdout,
            "stderr" => Sink::Stderr,
            path => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .append(append)
                    .truncate(!append)
                    .open(path)?;
                Sink::File(file)
            }
        };
        Ok(Logger { sink })
    }

    /// Writes one line, supplying the trailing newline.
    ///
    /// Any trailing newline already on `line` is stripped first, so the
    /// log stays newline-safe regardless of how the line was truncated.
    pub fn writeln(&mut self, line: &str) {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let _ = match &mut self.sink {
            Sink::Stdout => writeln!(std::io::stdout(), "{line}"),
            Sink::Stderr => writeln!(std::io::stderr(), "{line}"),
            Sink::File(file) => writeln!(file, "{line}"),
        };
    }

    /// Writes formatted text without a newline.
    pub fn write(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = match &mut self.sink {
            Sink::Stdout => std::io::stdout().write_fmt(args),
            Sink::Stderr => std::io::stderr().write_fmt(args),
            Sink::File(file) => file.write_fmt(args),
        };
    }
}
