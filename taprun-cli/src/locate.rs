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

//! Locating test executables
//!
//! A test name from the list is an abstract name: the executable may
//! live in the current directory, the build tree, or the source tree,
//! and may carry a `-t` or `.t` suffix.

use itertools::iproduct;
use nix::libc::{S_IFMT, S_IFREG};
use nix::sys::stat::stat;
use nix::unistd::AccessFlags;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/// Suffixes tried for each candidate base, in order
const SUFFIXES: [&str; 3] = ["-t", ".t", ""];

/// Resolves a test name to the executable to run.
///
/// Candidates are tried in the current directory, then the build root,
/// then the source root, each with the suffixes `-t`, `.t`, and none.
/// The first candidate that is a regular, executable file wins. When
/// nothing matches, the raw name is returned and the spawn will report
/// the failure.
pub fn resolve(name: &str, build: Option<&Path>, source: Option<&Path>) -> PathBuf {
    let mut bases = vec![PathBuf::from(".")];
    bases.extend(build.map(Path::to_path_buf));
    bases.extend(source.map(Path::to_path_buf));

    for (base, suffix) in iproduct!(&bases, &SUFFIXES) {
        let candidate = base.join(format!("{name}{suffix}"));
        if is_executable_file(&candidate) {
            return candidate;
        }
    }
    PathBuf::from(name)
}

/// Tests whether `path` names a regular file this process may execute.
fn is_executable_file(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    let regular = matches!(stat(c_path.as_c_str()), Ok(stat) if stat.st_mode & S_IFMT == S_IFREG);
    regular && nix::unistd::access(c_path.as_c_str(), AccessFlags::X_OK).is_ok()
}
