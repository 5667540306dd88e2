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

//! Command-line frontend for the taprun test harness
//!
//! This crate wires the argument parser, the test list, and the test
//! locator to the batch driver in `taprun-harness` and turns the batch
//! outcome into a process exit status: 0 when every test passed, 1 for
//! test failures or aborted sets, 2 for usage and fatal harness errors.

pub mod locate;
pub mod startup;
pub mod summary;

use crate::startup::args::{LogSpec, Parse, Run};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use taprun_harness::Harness;
use taprun_harness::context::Context;
use taprun_harness::log::Logger;
use taprun_harness::report::Reporter;
use taprun_harness::testset::Testset;

const USAGE: &str = "\
Usage: taprun [-AehSV] [-b build] [-s source] [-t seconds] [-L logfile]
              [-l list] [-o] [test ...]

  -A            append to the log file instead of truncating it
  -b build      build root to search for tests (default: $BUILD)
  -e            capture test stderr into the TAP stream
  -h            print this help and exit
  -L logfile    copy all child output to logfile ('stdout'/'stderr')
  -l list       file naming one test program per line
  -o            run a single test directly, showing its raw output
  -S            interpret TAP strictly (the 'strict' pragma default)
  -s source     source root to search for tests (default: $SOURCE)
  -t seconds    seconds to wait for output from a silent test (default 60)
  -V            print the version and exit
";

/// Entry point for the `taprun` binary; returns the exit status.
pub fn main() -> i32 {
    match startup::args::parse(std::env::args()) {
        Ok(Parse::Help) => {
            print!("{USAGE}");
            0
        }
        Ok(Parse::Version) => {
            println!("taprun {}", env!("CARGO_PKG_VERSION"));
            0
        }
        Ok(Parse::Run(run)) => run_tests(run),
        Err(error) => {
            eprintln!("taprun: {error}");
            eprint!("{USAGE}");
            2
        }
    }
}

fn run_tests(run: Run) -> i32 {
    let build = run.build.clone().or_else(|| std::env::var("BUILD").ok());
    let source = run.source.clone().or_else(|| std::env::var("SOURCE").ok());

    // Children locate their data through the same variables the
    // locator searches.
    // SAFETY: the harness is still single-threaded here.
    unsafe {
        if let Some(build) = &build {
            std::env::set_var("BUILD", build);
        }
        if let Some(source) = &source {
            std::env::set_var("SOURCE", source);
        }
    }

    let build = build.map(PathBuf::from);
    let source = source.map(PathBuf::from);

    if run.single {
        return exec_single(&run.tests[0], build.as_deref(), source.as_deref());
    }

    let mut testsets = match &run.list {
        Some(list) => match startup::list::read_list(list) {
            Ok(testsets) => testsets,
            Err(error) => {
                eprintln!("taprun: {error}");
                return 2;
            }
        },
        None => Vec::new(),
    };
    testsets.extend(run.tests.iter().map(|name| Testset::new(name.as_str())));

    match &run.list {
        Some(list) => println!(
            "Running all tests listed in {}.  If any tests fail, run the\n\
             failing test program with 'taprun -o' to see more details.\n",
            list.display()
        ),
        None => println!(
            "Running all specified tests.  If any tests fail, run the\n\
             failing test program with 'taprun -o' to see more details.\n"
        ),
    }

    let context = Context {
        strict: run.strict,
        capture_stderr: run.capture_stderr,
        blocking_time: run.blocking_time,
        ..Context::default()
    };
    let mut reporter = Reporter::stdout();
    if let Some(LogSpec { name, append }) = &run.log {
        match Logger::open(name, *append) {
            Ok(logger) => reporter.set_logger(logger),
            Err(error) => {
                eprintln!("taprun: cannot open log {name}: {error}");
                return 2;
            }
        }
    }

    let mut harness = Harness::new(context, reporter);
    let locate =
        move |name: &str| locate::resolve(name, build.as_deref(), source.as_deref());
    match taprun_harness::batch::run_batch(&mut harness, testsets, &locate) {
        Ok(result) => {
            summary::print(&result);
            if result.success() { 0 } else { 1 }
        }
        Err(error) => {
            eprintln!("taprun: {error}");
            2
        }
    }
}

/// Replaces the harness with a single test program (`-o`).
///
/// The test's raw TAP goes straight to the terminal, which is the
/// simplest way to look at one failing test in detail.
fn exec_single(name: &str, build: Option<&Path>, source: Option<&Path>) -> i32 {
    let path = locate::resolve(name, build, source);
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        eprintln!("taprun: unusable path {}", path.display());
        return 2;
    };

    let error = match nix::unistd::execv(&c_path, &[c_path.as_c_str()]) {
        Err(errno) => errno,
        Ok(infallible) => match infallible {},
    };
    eprintln!("taprun: cannot run {}: {}", path.display(), error);
    1
}
