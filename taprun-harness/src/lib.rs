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

//! Runtime of the taprun test harness
//!
//! This crate runs test programs one at a time and interprets their
//! standard output as TAP streams. The moving parts, in data-flow
//! order:
//!
//! - [`batch`] iterates the testsets and owns the per-set lifecycle;
//! - [`process`] forks each test program with its stdout on a pipe;
//! - [`reader`] pulls newline-terminated lines off the pipe;
//! - [`interp`] drives the per-set state machine in [`testset`],
//!   consulting the [`pragma`] registry and the [`context`] toggles;
//! - [`analyze`] reconciles the final state with the child's exit
//!   disposition;
//! - [`report`] and [`log`] carry the progress output and the verbatim
//!   stream log.
//!
//! The harness is strictly serial: one child at a time, one line at a
//! time, no threads. All shared mutable state lives in the [`Harness`]
//! value threaded through these modules.

pub mod analyze;
pub mod batch;
pub mod context;
pub mod interp;
pub mod log;
pub mod pragma;
pub mod process;
pub mod reader;
pub mod report;
pub mod testset;

#[doc(no_inline)]
pub use nix::errno::Errno;

use crate::context::Context;
use crate::pragma::Registry;
use crate::report::Reporter;

/// Bundle of the process-wide mutable harness state
///
/// Holds the runtime toggles, the pragma registry (with its saved
/// pre-toggle values), and the report sink. One `Harness` drives one
/// batch.
#[derive(Debug)]
pub struct Harness {
    /// Runtime toggles
    pub context: Context,
    /// Registered pragmas
    pub pragmas: Registry,
    /// Progress and log output
    pub reporter: Reporter,
}

impl Harness {
    /// Creates a harness with the built-in pragmas.
    pub fn new(context: Context, reporter: Reporter) -> Self {
        Harness {
            context,
            pragmas: Registry::builtin(),
            reporter,
        }
    }
}
