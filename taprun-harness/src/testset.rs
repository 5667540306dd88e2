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

//! Per-test-program parser state
//!
//! A [`Testset`] is the complete state for one test executable: it is
//! constructed empty by the batch driver, mutated one line at a time by
//! the interpreter, and consumed by the analyzer after the child has
//! been reaped.

use nix::sys::wait::WaitStatus;
use std::path::PathBuf;

/// Result recorded for a single test point
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TestStatus {
    /// The test passed.
    Pass,
    /// The test failed.
    Fail,
    /// The test was skipped.
    Skip,
    /// No result has been seen for this test number.
    ///
    /// Every slot starts out `Invalid`; a slot still `Invalid` at the
    /// end of the stream is a missing result.
    Invalid,
}

/// Progress of plan negotiation for a testset
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanStatus {
    /// Neither a plan nor a result has been seen.
    Init,
    /// The plan preceded the first result.
    First,
    /// Results have been seen but no plan yet.
    Pending,
    /// The plan followed the results it counts.
    Final,
}

/// Results array capacity used before any plan is seen
const INITIAL_ALLOCATION: usize = 32;

/// Complete parser state for one test executable
#[derive(Clone, Debug)]
pub struct Testset {
    /// Caller-supplied logical name of the test
    pub file: String,

    /// Resolved executable path, filled in by the test locator
    pub path: Option<PathBuf>,

    /// Plan negotiation progress
    pub plan: PlanStatus,

    /// Expected number of tests (0 until a plan or result is seen)
    pub count: usize,

    /// Last test number observed
    pub current: usize,

    /// Result table, indexed by test number − 1
    ///
    /// The vector length is the allocated capacity, which is at least
    /// `count`; slots at or beyond `count` are unused and stay
    /// [`Invalid`](TestStatus::Invalid).
    pub results: Vec<TestStatus>,

    /// Number of `Pass` results recorded
    pub passed: usize,

    /// Number of `Fail` results recorded
    pub failed: usize,

    /// Number of `Skip` results recorded
    pub skipped: usize,

    /// The stream or the child declared an abort.
    pub aborted: bool,

    /// A terminal diagnostic has already been printed, so the analyzer
    /// must not print a summary line of its own.
    pub reported: bool,

    /// The plan was the whole-set skip form (`1..0 # skip …`).
    pub all_skipped: bool,

    /// Free-text reason for a whole-set skip
    pub reason: Option<String>,

    /// Declared TAP version; 0 before the first line is inspected,
    /// defaulted to 12 when no header is present
    pub tap_version: u32,

    /// Raw wait status of the child, filled in by the supervisor
    pub status: Option<WaitStatus>,

    /// Width of the transient progress output currently on the cursor
    /// line, so the printer knows how much to erase
    pub length: usize,
}

impl Testset {
    /// Creates an empty testset for the named test program.
    pub fn new(file: impl Into<String>) -> Self {
        Testset {
            file: file.into(),
            path: None,
            plan: PlanStatus::Init,
            count: 0,
            current: 0,
            results: Vec::new(),
            passed: 0,
            failed: 0,
            skipped: 0,
            aborted: false,
            reported: false,
            all_skipped: false,
            reason: None,
            tap_version: 0,
            status: None,
            length: 0,
        }
    }

    /// Returns the capacity of the result table.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.results.len()
    }

    /// Grows the result table to exactly `n` slots if it is smaller.
    ///
    /// Used when a plan declares the test count up front.
    pub fn reserve_exact(&mut self, n: usize) {
        if n > self.results.len() {
            self.results.resize(n, TestStatus::Invalid);
        }
    }

    /// Grows the result table to hold at least `n` slots.
    ///
    /// Growth is geometric: the capacity starts at 32 and doubles until
    /// it reaches `n`, so a planless stream does not reallocate on every
    /// result. New slots are [`Invalid`](TestStatus::Invalid).
    pub fn reserve(&mut self, n: usize) {
        if n <= self.results.len() {
            return;
        }
        let mut len = self.results.len().max(INITIAL_ALLOCATION);
        while len < n {
            len *= 2;
        }
        self.results.resize(len, TestStatus::Invalid);
    }

    /// Records the result for test `number`.
    ///
    /// The slot must be allocated and still
    /// [`Invalid`](TestStatus::Invalid); the matching counter is bumped
    /// and `current` advances to `number`.
    pub fn record(&mut self, number: usize, status: TestStatus) {
        debug_assert_eq!(self.results[number - 1], TestStatus::Invalid);
        self.results[number - 1] = status;
        match status {
            TestStatus::Pass => self.passed += 1,
            TestStatus::Fail => self.failed += 1,
            TestStatus::Skip => self.skipped += 1,
            TestStatus::Invalid => unreachable!("cannot record a missing result"),
        }
        self.current = number;
    }

    /// Counts the tests below `count` that never produced a result.
    #[must_use]
    pub fn missing(&self) -> usize {
        self.results[..self.count]
            .iter()
            .filter(|&&status| status == TestStatus::Invalid)
            .count()
    }
}
