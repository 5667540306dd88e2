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

//! Plan lines (`1..N`)

use crate::scan;

/// Parsed form of a plan line
///
/// A plan declares how many tests the producer intends to run. The
/// special form `1..0 # skip <reason>` declares that the whole test
/// program is skipped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Plan {
    /// Declared number of tests
    ///
    /// The count is taken at face value; deciding whether a non-positive
    /// count is an error is up to the consumer.
    pub count: i64,

    /// Skip reason, if the plan carried a `# skip` directive
    ///
    /// `Some` even when the reason text is empty, so that a bare
    /// `1..0 # skip` is distinguishable from a lone `1..0`.
    pub skip: Option<String>,
}

impl Plan {
    /// Parses a plan line.
    ///
    /// Returns `None` unless `line` starts with `1..`. The count is read
    /// as a leading digit run; a missing count is read as 0. Trailing
    /// text is ignored unless it is a `# skip` directive.
    pub fn parse(line: &str) -> Option<Plan> {
        let rest = line.strip_prefix("1..")?;
        let (count, rest) = scan::number(rest).unwrap_or((0, rest));

        let rest = rest.trim_start();
        let skip = rest.strip_prefix('#').and_then(|comment| {
            let comment = comment.trim_start();
            if scan::word_prefix(comment, "skip") {
                let reason = comment[4..]
                    .trim_start_matches(|c: char| c.is_ascii_alphabetic())
                    .trim();
                Some(reason.to_owned())
            } else {
                None
            }
        });

        Some(Plan { count, skip })
    }
}
