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

// Token scanning helpers shared by the line parsers

/// Reads a decimal number from the start of `s`.
///
/// An optional `+` or `-` sign may precede the digits. The scan stops at
/// the first non-digit byte; there must be at least one digit for the
/// scan to succeed. The value saturates at the `i64` range instead of
/// overflowing, like `strtol`.
///
/// Returns the value and the unscanned remainder of `s`.
pub(crate) fn number(s: &str) -> Option<(i64, &str)> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let len = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if len == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for byte in digits[..len].bytes() {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }
    if negative {
        value = value.saturating_neg();
    }
    Some((value, &digits[len..]))
}

/// Tests whether `s` begins with the given directive word, ignoring case.
///
/// TAP directives are matched as case-insensitive prefixes, so `SKIP`,
/// `skipped`, and `Skipping` all count as `skip`.
pub(crate) fn word_prefix(s: &str, word: &str) -> bool {
    // Compare as bytes so a multibyte character after the prefix cannot
    // split a char boundary.
    s.len() >= word.len() && s.as_bytes()[..word.len()].eq_ignore_ascii_case(word.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_plain() {
        assert_eq!(number("42"), Some((42, "")));
        assert_eq!(number("7 rest"), Some((7, " rest")));
        assert_eq!(number("3x"), Some((3, "x")));
    }

    #[test]
    fn number_signed() {
        assert_eq!(number("-5"), Some((-5, "")));
        assert_eq!(number("+5"), Some((5, "")));
    }

    #[test]
    fn number_absent() {
        assert_eq!(number(""), None);
        assert_eq!(number("abc"), None);
        assert_eq!(number("- 1"), None);
        assert_eq!(number(" 1"), None);
    }

    #[test]
    fn number_saturates() {
        assert_eq!(number("99999999999999999999"), Some((i64::MAX, "")));
    }

    #[test]
    fn word_prefix_cases() {
        assert!(word_prefix("skip flaky", "skip"));
        assert!(word_prefix("SKIPPED: no tty", "skip"));
        assert!(word_prefix("Todo later", "todo"));
        assert!(!word_prefix("ski", "skip"));
        assert!(!word_prefix("stop", "skip"));
    }
}
