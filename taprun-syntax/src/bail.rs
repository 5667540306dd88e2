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

//! Bail-out lines (`Bail out!`)

/// Scans a line for a `Bail out!` marker.
///
/// The marker may appear anywhere in the line (substring match, as
/// traditional TAP consumers do). Returns the trimmed text following the
/// marker; the text may be empty.
pub fn bail_out(line: &str) -> Option<&str> {
    const MARKER: &str = "Bail out!";
    let index = line.find(MARKER)?;
    Some(line[index + MARKER.len()..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_line_start() {
        assert_eq!(bail_out("Bail out! db down"), Some("db down"));
    }

    #[test]
    fn mid_line() {
        assert_eq!(bail_out("### Bail out! oh no"), Some("oh no"));
    }

    #[test]
    fn empty_trailer() {
        assert_eq!(bail_out("Bail out!"), Some(""));
        assert_eq!(bail_out("Bail out!   "), Some(""));
    }

    #[test]
    fn no_marker() {
        assert_eq!(bail_out("ok 1 - bail"), None);
        assert_eq!(bail_out("bail out! lowercase"), None);
    }
}
