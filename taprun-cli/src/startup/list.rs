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

//! Test list files
//!
//! A test list names one test program per line. Blank lines and lines
//! whose first non-blank character is `#` are ignored.

use std::path::{Path, PathBuf};
use taprun_harness::testset::Testset;
use thiserror::Error;

/// Longest test name the list reader accepts
pub const MAX_LINE: usize = 1024;

/// Error reading a test list
#[derive(Debug, Error)]
pub enum ListError {
    /// The file could not be read at all.
    #[error("cannot read {}: {}", .path.display(), .error)]
    Io {
        /// The list file
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },
    /// A line exceeded [`MAX_LINE`].
    #[error("{}:{}: line too long", .path.display(), .line)]
    LineTooLong {
        /// The list file
        path: PathBuf,
        /// 1-based line number
        line: usize,
    },
}

/// Reads a test list into one testset skeleton per named test.
pub fn read_list(path: &Path) -> Result<Vec<Testset>, ListError> {
    let bytes = std::fs::read(path).map_err(|error| ListError::Io {
        path: path.to_owned(),
        error,
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let mut testsets = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.len() >= MAX_LINE {
            return Err(ListError::LineTooLong {
                path: path.to_owned(),
                line: index + 1,
            });
        }
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        testsets.push(Testset::new(name));
    }
    Ok(testsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write as _;

    fn write_list(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.list");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        (dir, path)
    }

    #[test]
    fn names_one_test_per_line() {
        let (_dir, path) = write_list("basic\nparser\nio/reader\n");
        let testsets = read_list(&path).unwrap();
        let names: Vec<&str> = testsets.iter().map(|ts| ts.file.as_str()).collect();
        assert_eq!(names, ["basic", "parser", "io/reader"]);
    }

    #[test]
    fn comments_and_blanks_are_ignored() {
        let (_dir, path) = write_list("# the suite\n\nbasic\n  # indented comment\n  spaced  \n");
        let testsets = read_list(&path).unwrap();
        let names: Vec<&str> = testsets.iter().map(|ts| ts.file.as_str()).collect();
        assert_eq!(names, ["basic", "spaced"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nowhere.list");
        assert_matches!(read_list(&path), Err(ListError::Io { .. }));
    }

    #[test]
    fn overlong_line_is_rejected_with_its_number() {
        let long = "x".repeat(MAX_LINE);
        let (_dir, path) = write_list(&format!("ok-name\n{long}\n"));
        assert_matches!(
            read_list(&path),
            Err(ListError::LineTooLong { line: 2, .. })
        );
    }
}
