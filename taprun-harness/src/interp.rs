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

//! The TAP stream interpreter
//!
//! [`consume`] drives one [`Testset`] one input line at a time. The
//! order of the line-kind checks is the state machine:
//!
//! 1. bail-out (outranks everything, even a truncated line)
//! 2. truncated line (no trailing newline): logged and dropped
//! 3. `TAP version` header, first line only
//! 4. pragma directives, TAP 13 and later only
//! 5. `#` diagnostics
//! 6. plan
//! 7. test result
//! 8. anything else, ignored (an error under `strict`)
//!
//! A violation marks the testset aborted and reported; the caller keeps
//! draining the pipe but stops feeding lines here.

use crate::Harness;
use crate::pragma::{Registry, Toggle};
use crate::report::Reporter;
use crate::testset::{PlanStatus, TestStatus, Testset};
use taprun_syntax::plan::Plan;
use taprun_syntax::result::{Directive, TestLine};
use taprun_syntax::{bail_out, pragma, version};

/// Prints a terminal diagnostic and puts the testset into the aborted,
/// reported state.
fn abort(ts: &mut Testset, reporter: &mut Reporter, reason: Option<&str>) {
    let text = match reason {
        Some(reason) => format!("ABORTED ({reason})"),
        None => "ABORTED".to_owned(),
    };
    reporter.status_line(ts, &text);
    ts.aborted = true;
    ts.reported = true;
}

/// Feeds one line of child output into the testset state machine.
///
/// `line` is exactly what the reader produced: a trailing newline marks
/// a complete line, its absence a truncated one. The caller is expected
/// to have forwarded the line to the log sink already and to stop
/// calling once `ts.aborted` is set.
pub fn consume(harness: &mut Harness, ts: &mut Testset, line: &str) {
    let Harness {
        context,
        pragmas,
        reporter,
    } = harness;

    if let Some(reason) = bail_out(line) {
        let reason = (!reason.is_empty()).then_some(reason);
        abort(ts, reporter, reason);
        return;
    }

    let Some(text) = line.strip_suffix('\n') else {
        // Truncated by the line length bound; already logged.
        return;
    };

    if ts.tap_version == 0 {
        ts.tap_version = 12;
        if let Some(declared) = version::parse(text) {
            if declared < 13 {
                abort(ts, reporter, Some(&format!("Invalid TAP version: {declared}")));
            } else {
                ts.tap_version = declared as u32;
            }
            return;
        }
        // No header; the first line is ordinary input under version 12.
    }

    if ts.tap_version >= 13 {
        if let Some(parse) = pragma::parse(text) {
            match parse {
                Ok(items) => apply_pragmas(context, pragmas, &items, text),
                Err(_) => abort(ts, reporter, Some("invalid pragma")),
            }
            return;
        }
    }

    if text.trim_start().starts_with('#') {
        return;
    }

    if let Some(plan) = Plan::parse(text) {
        handle_plan(ts, reporter, &plan);
        return;
    }

    if let Some(test) = TestLine::parse(text) {
        handle_result(ts, reporter, &test);
        return;
    }

    if context.strict && !text.trim().is_empty() {
        abort(ts, reporter, Some("invalid line"));
    }
}

fn apply_pragmas(
    context: &mut crate::context::Context,
    pragmas: &mut Registry,
    items: &[taprun_syntax::PragmaItem],
    line: &str,
) {
    for item in items {
        let op = if item.on { Toggle::On } else { Toggle::Off };
        pragmas.apply(context, &item.name, op);
    }
    pragmas.offer(context, line);
}

fn handle_plan(ts: &mut Testset, reporter: &mut Reporter, plan: &Plan) {
    if plan.count == 0 {
        if let Some(reason) = &plan.skip {
            ts.all_skipped = true;
            ts.aborted = true;
            ts.reason = (!reason.is_empty()).then(|| reason.clone());
            ts.count = 0;
            ts.passed = 0;
            ts.failed = 0;
            ts.skipped = 0;
            return;
        }
    }
    if plan.count <= 0 {
        abort(ts, reporter, Some("invalid test count"));
        return;
    }

    let count = plan.count as usize;
    match ts.plan {
        PlanStatus::Init => {
            ts.reserve_exact(count);
            ts.count = count;
            ts.plan = PlanStatus::First;
        }
        PlanStatus::Pending => {
            if count < ts.count {
                abort(ts, reporter, Some(&format!("invalid test number {count}")));
            } else {
                ts.reserve_exact(count);
                ts.count = count;
                ts.plan = PlanStatus::Final;
            }
        }
        PlanStatus::First | PlanStatus::Final => {
            abort(ts, reporter, Some("multiple plans"));
        }
    }
}

fn handle_result(ts: &mut Testset, reporter: &mut Reporter, test: &TestLine) {
    let number = test.number.unwrap_or(ts.current as i64 + 1);
    if number < 1 {
        abort(ts, reporter, Some(&format!("invalid test number {number}")));
        return;
    }
    let number = number as usize;

    match ts.plan {
        PlanStatus::First | PlanStatus::Final => {
            if number > ts.count {
                abort(ts, reporter, Some(&format!("invalid test number {number}")));
                return;
            }
        }
        PlanStatus::Init | PlanStatus::Pending => {
            ts.plan = PlanStatus::Pending;
            ts.reserve(number);
            if number > ts.count {
                ts.count = number;
            }
        }
    }

    let status = match (test.ok, test.directive) {
        (_, Some(Directive::Skip)) => TestStatus::Skip,
        // An unexpected pass of a test marked "todo" counts as a
        // failure; only the expected failure is excused.
        (true, Some(Directive::Todo)) => TestStatus::Fail,
        (false, Some(Directive::Todo)) => TestStatus::Skip,
        (true, None) => TestStatus::Pass,
        (false, None) => TestStatus::Fail,
    };

    if ts.results[number - 1] != TestStatus::Invalid {
        abort(ts, reporter, Some(&format!("duplicate test number {number}")));
        return;
    }
    ts.record(number, status);
    reporter.progress(ts, number);
}
