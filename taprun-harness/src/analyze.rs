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

//! Final reconciliation of a testset with its child's exit disposition
//!
//! After the stream has ended and the child has been reaped, [`analyze`]
//! prints the testset's status line (unless the interpreter already
//! printed a terminal diagnostic) and produces the verdict the batch
//! driver accumulates.

use crate::process::{CHILD_DUP_FAILED, CHILD_EXEC_FAILED, CHILD_NULL_FAILED};
use crate::report::Reporter;
use crate::testset::{PlanStatus, TestStatus, Testset};
use nix::sys::wait::WaitStatus;

/// Classification of a finished testset
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Disposition {
    /// Stream and child both ended cleanly.
    Ok,
    /// The whole set was skipped via `1..0 # skip`.
    AllSkipped,
    /// The results parsed, but the child's exit was irregular.
    Dubious,
    /// The stream, the child's setup, or the plan aborted the set.
    Aborted,
}

/// Verdict for one testset
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub struct Verdict {
    /// Whether the set counts as successful
    pub success: bool,
    /// How the set ended
    pub disposition: Disposition,
}

fn child_setup_error(code: i32) -> Option<&'static str> {
    match code {
        CHILD_DUP_FAILED => Some("ABORTED (can't dup file descriptors)"),
        CHILD_EXEC_FAILED => Some("ABORTED (execution failed -- not found?)"),
        CHILD_NULL_FAILED => Some("ABORTED (can't open /dev/null)"),
        _ => None,
    }
}

/// Produces the verdict for a finished testset.
///
/// Prints the status line as a side effect and, as the final cleanup,
/// promotes every missing result below the planned count to a failure
/// so the aggregate counters reflect them.
pub fn analyze(ts: &mut Testset, reporter: &mut Reporter) -> Verdict {
    reporter.clear_progress(ts);
    let missing = ts.missing();

    let verdict = if ts.reported {
        Verdict {
            success: false,
            disposition: Disposition::Aborted,
        }
    } else if ts.all_skipped {
        let text = match &ts.reason {
            Some(reason) => format!("skipped ({reason})"),
            None => "skipped".to_owned(),
        };
        reporter.status_line(ts, &text);
        Verdict {
            success: true,
            disposition: Disposition::AllSkipped,
        }
    } else {
        match ts.status {
            Some(WaitStatus::Exited(_, code)) if code != 0 => {
                if let Some(message) = child_setup_error(code) {
                    ts.aborted = true;
                    reporter.status_line(ts, message);
                    Verdict {
                        success: false,
                        disposition: Disposition::Aborted,
                    }
                } else {
                    summarize(ts, reporter);
                    Verdict {
                        success: ts.failed == 0 && missing == 0,
                        disposition: Disposition::Dubious,
                    }
                }
            }
            Some(WaitStatus::Signaled(..)) => {
                summarize(ts, reporter);
                Verdict {
                    success: false,
                    disposition: Disposition::Dubious,
                }
            }
            _ => {
                if matches!(ts.plan, PlanStatus::First | PlanStatus::Final) {
                    summarize(ts, reporter);
                    Verdict {
                        success: ts.failed == 0 && missing == 0,
                        disposition: Disposition::Ok,
                    }
                } else {
                    ts.aborted = true;
                    reporter.status_line(ts, "ABORTED (no valid test plan)");
                    Verdict {
                        success: false,
                        disposition: Disposition::Aborted,
                    }
                }
            }
        }
    };

    for slot in &mut ts.results[..ts.count] {
        if *slot == TestStatus::Invalid {
            *slot = TestStatus::Fail;
            ts.failed += 1;
        }
    }

    verdict
}

/// Prints the normal status line for a set that was not aborted.
fn summarize(ts: &mut Testset, reporter: &mut Reporter) {
    let missing: Vec<usize> = slots_with(ts, TestStatus::Invalid);
    let failed: Vec<usize> = slots_with(ts, TestStatus::Fail);

    let mut text = String::new();
    if missing.is_empty() && failed.is_empty() {
        text.push_str("ok");
        if ts.skipped > 0 {
            let plural = if ts.skipped == 1 { "test" } else { "tests" };
            text.push_str(&format!(" (skipped {} {plural})", ts.skipped));
        }
    } else {
        if !missing.is_empty() {
            text.push_str(&format!("MISSED {}", format_ranges(&missing)));
        }
        if !failed.is_empty() {
            if !text.is_empty() {
                text.push_str("; ");
            }
            text.push_str(&format!("FAILED {}", format_ranges(&failed)));
        }
    }

    match ts.status {
        Some(WaitStatus::Exited(_, code)) if code != 0 => {
            text.push_str(&format!(", exit status {code}"));
        }
        Some(WaitStatus::Signaled(_, signal, core_dumped)) => {
            text.push_str(&format!(", killed by signal {}", signal as i32));
            if core_dumped {
                text.push_str(" (core dumped)");
            }
        }
        _ => {}
    }

    reporter.status_line(ts, &text);
}

fn slots_with(ts: &Testset, status: TestStatus) -> Vec<usize> {
    ts.results[..ts.count]
        .iter()
        .enumerate()
        .filter(|&(_, &slot)| slot == status)
        .map(|(index, _)| index + 1)
        .collect()
}

/// Formats an ascending list of test numbers as compact ranges, like
/// `2, 5-7, 9`.
pub fn format_ranges(numbers: &[usize]) -> String {
    let mut text = String::new();
    let mut index = 0;
    while index < numbers.len() {
        let start = numbers[index];
        let mut end = start;
        while index + 1 < numbers.len() && numbers[index + 1] == end + 1 {
            index += 1;
            end = numbers[index];
        }
        if !text.is_empty() {
            text.push_str(", ");
        }
        if start == end {
            text.push_str(&start.to_string());
        } else {
            text.push_str(&format!("{start}-{end}"));
        }
        index += 1;
    }
    text
}
