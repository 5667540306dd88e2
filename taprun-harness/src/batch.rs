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

//! The serial batch driver
//!
//! Runs each testset in turn: reset the pragmas, resolve and spawn the
//! test program, pump its output through the interpreter, drain
//! whatever follows an abort so the child cannot block on a full pipe,
//! reap, analyze, and accumulate the aggregate counters.

use crate::Harness;
use crate::analyze::{Disposition, analyze};
use crate::interp;
use crate::process;
use crate::reader::{LineReader, Read};
use crate::testset::Testset;
use nix::errno::Errno;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal error that ends the whole batch
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum BatchError {
    /// The pipe or fork for a test program could not be created.
    #[error("cannot run {file}: {errno}")]
    Spawn {
        /// Logical name of the testset being started
        file: String,
        /// Raw error from the failed system call
        errno: Errno,
    },
}

/// Aggregate outcome of a batch run
#[derive(Clone, Debug, Default)]
pub struct BatchResult {
    /// Number of testsets run
    pub sets: usize,
    /// Number of testsets that aborted
    pub aborted: usize,
    /// Number of testsets skipped as a whole
    pub skipped_sets: usize,
    /// Total tests planned across all sets
    pub total: usize,
    /// Tests passed
    pub passed: usize,
    /// Tests failed, including missing results
    pub failed: usize,
    /// Tests skipped
    pub skipped: usize,
    /// Testsets that did not succeed, in run order
    pub failures: Vec<Testset>,
}

impl BatchResult {
    /// Whether the whole batch counts as successful
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed == 0 && self.aborted == 0
    }
}

/// Runs every testset in order and accumulates the results.
///
/// `locate` resolves a testset's logical name to the executable to
/// spawn. Only a failure to create the child process at all ends the
/// batch early; everything a test program itself can do wrong is
/// absorbed into its own verdict.
pub fn run_batch(
    harness: &mut Harness,
    testsets: Vec<Testset>,
    locate: &dyn Fn(&str) -> PathBuf,
) -> Result<BatchResult, BatchError> {
    let width = testsets
        .iter()
        .map(|ts| ts.file.len())
        .max()
        .unwrap_or(0)
        + 3;

    let mut result = BatchResult::default();
    for mut ts in testsets {
        harness.pragmas.reset_all(&mut harness.context);
        let path = locate(&ts.file);
        ts.path = Some(path.clone());
        harness.reporter.start(&ts, width);

        run_one(harness, &mut ts, &path)?;
        let verdict = analyze(&mut ts, &mut harness.reporter);

        result.sets += 1;
        result.total += ts.count;
        result.passed += ts.passed;
        result.failed += ts.failed;
        result.skipped += ts.skipped;
        match verdict.disposition {
            Disposition::Aborted => result.aborted += 1,
            Disposition::AllSkipped => result.skipped_sets += 1,
            Disposition::Ok | Disposition::Dubious => {}
        }
        if !verdict.success {
            result.failures.push(ts);
        }
    }
    Ok(result)
}

/// Runs one spawned testset to stream end and reaps the child.
fn run_one(harness: &mut Harness, ts: &mut Testset, path: &Path) -> Result<(), BatchError> {
    let (fd, pid) = process::spawn(path, &harness.context).map_err(|errno| BatchError::Spawn {
        file: ts.file.clone(),
        errno,
    })?;

    let mut reader = LineReader::new(fd);
    loop {
        match reader.next_line(&harness.context) {
            Ok(Read::Line(line)) => {
                harness.reporter.log_line(&line);
                if !ts.aborted {
                    interp::consume(harness, ts, &line);
                }
            }
            Ok(Read::Eof(rest)) => {
                if !rest.is_empty() {
                    harness.reporter.log_line(&rest);
                    if !ts.aborted {
                        interp::consume(harness, ts, &rest);
                    }
                }
                break;
            }
            // An unreadable pipe ends the stream; the reap decides what
            // it meant.
            Err(_) => break,
        }
    }
    drop(reader);

    ts.status = process::reap(pid).ok();
    Ok(())
}
