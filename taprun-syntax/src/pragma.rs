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

//! Pragma directive lines (`pragma ±name[, ±name …]`)
//!
//! Pragmas are harness-scoped toggles a test emits in-band. The grammar
//! is:
//!
//! ```text
//! pragma := "pragma" WS item (WS? "," WS? item)*
//! item   := ("+" | "-") IDENT
//! IDENT  := [A-Za-z0-9_]+
//! ```
//!
//! The scanner always advances past the whole identifier token, so an
//! unrecognized name never desynchronizes the rest of the list.

use thiserror::Error;

/// One `±name` item of a pragma directive
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PragmaItem {
    /// Pragma name
    pub name: String,
    /// `true` for `+name`, `false` for `-name`
    pub on: bool,
}

/// Error in a line that is a pragma directive but malformed
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PragmaError {
    /// An item did not begin with `+` or `-`.
    #[error("expected '+' or '-' before pragma name")]
    MissingSign,
    /// A sign was not followed by an identifier.
    #[error("missing pragma name after sign")]
    MissingName,
    /// Something other than a `,` separator followed an item.
    #[error("unexpected character {0:?} after pragma name")]
    TrailingJunk(char),
}

/// Parses a pragma directive line.
///
/// Returns `None` unless the first word of `line` is `pragma`. A claimed
/// but malformed directive yields an error; the caller is expected to
/// treat that as fatal to the current testset.
pub fn parse(line: &str) -> Option<Result<Vec<PragmaItem>, PragmaError>> {
    let rest = line.trim_start().strip_prefix("pragma")?;
    if !rest.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    Some(parse_items(rest))
}

fn parse_items(mut rest: &str) -> Result<Vec<PragmaItem>, PragmaError> {
    let mut items = Vec::new();
    loop {
        rest = rest.trim_start();
        let on = match rest.chars().next() {
            Some('+') => true,
            Some('-') => false,
            _ => return Err(PragmaError::MissingSign),
        };
        rest = &rest[1..];

        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(PragmaError::MissingName);
        }
        items.push(PragmaItem {
            name: rest[..len].to_owned(),
            on,
        });
        rest = &rest[len..];

        rest = rest.trim_start();
        match rest.chars().next() {
            None => return Ok(items),
            Some(',') => rest = &rest[1..],
            Some(c) => return Err(PragmaError::TrailingJunk(c)),
        }
    }
}
