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

//! Test result lines (`ok N`, `not ok N`)

use crate::scan;

/// In-band directive trailing a test result
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Directive {
    /// `# skip …`: the test was not run
    Skip,
    /// `# todo …`: the test is not yet expected to pass
    Todo,
}

/// Parsed form of a test result line
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestLine {
    /// Whether the line said `ok` (as opposed to `not ok`)
    pub ok: bool,

    /// The test number, if one followed the `ok`
    ///
    /// `None` when the number is absent or unparsable; the consumer
    /// substitutes the next expected number.
    pub number: Option<i64>,

    /// Trailing directive, if any
    pub directive: Option<Directive>,
}

impl TestLine {
    /// Parses a test result line.
    ///
    /// Returns `None` unless the line begins with the word `ok` or
    /// `not ok`. The leading word must end at a word boundary, so a
    /// diagnostic like `okay, starting` is not mistaken for a result.
    /// Description text is ignored; the first `#` on the line starts the
    /// directive, whose word is matched as a case-insensitive prefix.
    pub fn parse(line: &str) -> Option<TestLine> {
        let (ok, rest) = if let Some(rest) = line.strip_prefix("not ok") {
            (false, rest)
        } else if let Some(rest) = line.strip_prefix("ok") {
            (true, rest)
        } else {
            return None;
        };
        match rest.chars().next() {
            None => {}
            Some(c) if c.is_ascii_whitespace() || c == '#' => {}
            Some(_) => return None,
        }

        let number = scan::number(rest.trim_start()).map(|(n, _)| n);

        let directive = rest.find('#').and_then(|i| {
            let word = rest[i + 1..].trim_start();
            if scan::word_prefix(word, "skip") {
                Some(Directive::Skip)
            } else if scan::word_prefix(word, "todo") {
                Some(Directive::Todo)
            } else {
                None
            }
        });

        Some(TestLine {
            ok,
            number,
            directive,
        })
    }
}
