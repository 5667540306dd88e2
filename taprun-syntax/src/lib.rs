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

//! Line grammar for the Test Anything Protocol (TAP) as consumed by the
//! taprun harness.
//!
//! This crate recognizes individual TAP lines: plans ([`plan`]), test
//! results ([`result`]), version headers ([`version`]), harness pragmas
//! ([`pragma`]), and bail-out markers ([`bail`]). Each parser inspects a
//! single line with no trailing newline and either claims it or returns
//! `None`, leaving the decision of *when* each form is legal to the
//! interpreter in the `taprun-harness` crate. The parsers keep the lax
//! habits of traditional TAP consumers: numbers are read as a leading
//! digit run and trailing junk on an otherwise well-formed line is
//! ignored.

mod scan;

pub mod bail;
pub mod plan;
pub mod pragma;
pub mod result;
pub mod version;

pub use bail::bail_out;
pub use plan::Plan;
pub use pragma::{PragmaError, PragmaItem};
pub use result::{Directive, TestLine};
