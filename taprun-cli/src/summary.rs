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

//! The closing batch summary

use std::fmt::Write as _;
use taprun_harness::analyze::format_ranges;
use taprun_harness::batch::BatchResult;
use taprun_harness::testset::{TestStatus, Testset};
use nix::sys::wait::WaitStatus;

/// Renders the closing summary for a finished batch.
pub fn render(result: &BatchResult) -> String {
    let mut text = String::from("\n");

    if !result.failures.is_empty() {
        let _ = writeln!(
            text,
            "{:<26} {:>14} {:>4} {:>4}  {}",
            "Failed Set", "Fail/Total (%)", "Skip", "Stat", "Failing Tests"
        );
        let _ = writeln!(
            text,
            "{} {} {} {}  {}",
            "-".repeat(26),
            "-".repeat(14),
            "-".repeat(4),
            "-".repeat(4),
            "-".repeat(24)
        );
        for ts in &result.failures {
            let _ = writeln!(text, "{}", failure_row(ts));
        }
        text.push('\n');
    }

    if result.failures.is_empty() && result.failed == 0 && result.aborted == 0 {
        text.push_str("All tests successful.\n");
    } else {
        let okay = result.total.saturating_sub(result.failed);
        let percent = if result.total > 0 {
            100.0 * okay as f64 / result.total as f64
        } else {
            0.0
        };
        let _ = writeln!(
            text,
            "Failed {}/{} tests, {:.2}% okay.",
            result.failed, result.total, percent
        );
    }
    if result.aborted > 0 {
        let _ = writeln!(
            text,
            "Aborted {} test {}.",
            result.aborted,
            plural(result.aborted, "set", "sets")
        );
    }
    if result.skipped > 0 {
        let _ = writeln!(
            text,
            "{} {} skipped.",
            result.skipped,
            plural(result.skipped, "test", "tests")
        );
    }
    if result.skipped_sets > 0 {
        let _ = writeln!(
            text,
            "{} test {} skipped as a whole.",
            result.skipped_sets,
            plural(result.skipped_sets, "set", "sets")
        );
    }

    text
}

/// Prints the summary to standard output.
pub fn print(result: &BatchResult) {
    print!("{}", render(result));
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn failure_row(ts: &Testset) -> String {
    let failing: Vec<usize> = ts
        .results
        .iter()
        .take(ts.count)
        .enumerate()
        .filter(|&(_, &status)| status == TestStatus::Fail)
        .map(|(index, _)| index + 1)
        .collect();

    let percent = if ts.count > 0 {
        100.0 * ts.failed as f64 / ts.count as f64
    } else {
        0.0
    };
    let status = match ts.status {
        Some(WaitStatus::Exited(_, code)) => code,
        Some(WaitStatus::Signaled(_, signal, _)) => -(signal as i32),
        _ => 0,
    };

    format!(
        "{:<26} {:>6}/{:<3}{:>3.0}% {:>4} {:>4}  {}",
        ts.file,
        ts.failed,
        ts.count,
        percent,
        ts.skipped,
        status,
        format_ranges(&failing)
    )
}
