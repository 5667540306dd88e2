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

//! Version header lines (`TAP version N`)

use crate::scan;

/// Parses a `TAP version N` header line.
///
/// Returns `None` unless the line starts with the literal (and
/// case-sensitive) words `TAP version `. A missing or unparsable number
/// is read as 0, which no consumer accepts as a valid version.
pub fn parse(line: &str) -> Option<i64> {
    let rest = line.strip_prefix("TAP version ")?;
    Some(scan::number(rest.trim_start()).map_or(0, |(n, _)| n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_header() {
        assert_eq!(parse("TAP version 13"), Some(13));
        assert_eq!(parse("TAP version 14"), Some(14));
    }

    #[test]
    fn version_is_case_sensitive() {
        assert_eq!(parse("tap version 13"), None);
        assert_eq!(parse("TAP Version 13"), None);
    }

    #[test]
    fn not_a_header() {
        assert_eq!(parse("TAP version"), None);
        assert_eq!(parse("1..2"), None);
    }

    #[test]
    fn garbage_version_reads_as_zero() {
        assert_eq!(parse("TAP version next"), Some(0));
    }

    #[test]
    fn negative_version_is_preserved() {
        assert_eq!(parse("TAP version -1"), Some(-1));
    }
}
