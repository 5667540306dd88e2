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

//! Per-testset progress output and the log fan-out
//!
//! The reporter prints the `name......status` progress lines and, when
//! standard output is a terminal, a transient `n/count` counter while a
//! test program is running. It also forwards every consumed child line
//! to the optional [`Logger`]. All writes are best-effort.

use crate::log::Logger;
use crate::testset::Testset;
use std::io::Write;

/// Print sink for the batch progress report
#[must_use = "a Reporter only writes when driven by the harness"]
pub struct Reporter {
    sink: Box<dyn Write>,
    tty: bool,
    logger: Option<Logger>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("tty", &self.tty)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    /// Creates a reporter bound to standard output.
    ///
    /// The live test counter is enabled only when standard output is a
    /// terminal.
    pub fn stdout() -> Self {
        let tty = unsafe { nix::libc::isatty(nix::libc::STDOUT_FILENO) } == 1;
        Reporter {
            sink: Box::new(std::io::stdout()),
            tty,
            logger: None,
        }
    }

    /// Creates a reporter writing to an arbitrary sink, with the live
    /// counter disabled.
    pub fn with_sink(sink: Box<dyn Write>) -> Self {
        Reporter {
            sink,
            tty: false,
            logger: None,
        }
    }

    /// Attaches a verbatim log sink.
    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = Some(logger);
    }

    /// Forwards one consumed child line to the log sink, if any.
    pub fn log_line(&mut self, line: &str) {
        if let Some(logger) = &mut self.logger {
            logger.writeln(line);
        }
    }

    /// Prints the `name....` prefix of a testset's report line.
    ///
    /// `width` is the column the status text should start at, computed
    /// by the batch driver from the longest test name.
    pub fn start(&mut self, ts: &Testset, width: usize) {
        let dots = width.saturating_sub(ts.file.len()).max(3);
        let _ = write!(self.sink, "{}{:.<dots$}", ts.file, "");
        let _ = self.sink.flush();
    }

    /// Shows the live `n/count` counter after an accepted result.
    ///
    /// Does nothing unless standard output is a terminal. The counter
    /// overwrites the previous one in place; its width is kept in
    /// `ts.length` so it can be erased later.
    pub fn progress(&mut self, ts: &mut Testset, number: usize) {
        if !self.tty {
            return;
        }
        let text = if ts.count > 0 {
            format!("{}/{}", number, ts.count)
        } else {
            format!("{number}")
        };
        let erase = "\u{8}".repeat(ts.length);
        let _ = write!(self.sink, "{erase}{text}");
        let _ = self.sink.flush();
        ts.length = text.len();
    }

    /// Erases the live counter, if one is showing.
    pub fn clear_progress(&mut self, ts: &mut Testset) {
        if ts.length == 0 {
            return;
        }
        let back = "\u{8}".repeat(ts.length);
        let blank = " ".repeat(ts.length);
        let _ = write!(self.sink, "{back}{blank}{back}");
        let _ = self.sink.flush();
        ts.length = 0;
    }

    /// Completes a testset's report line with its status text.
    pub fn status_line(&mut self, ts: &mut Testset, text: &str) {
        self.clear_progress(ts);
        let _ = writeln!(self.sink, "{text}");
        let _ = self.sink.flush();
    }
}
