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

//! Command-line argument parsing
//!
//! Options follow the POSIX single-letter convention, with clustering
//! (`-eS`) and attached option arguments (`-ttests.list`) supported.
//! A `--` ends option parsing; remaining words are test names.

use std::path::PathBuf;
use taprun_harness::context::DEFAULT_BLOCKING_TIME;
use thiserror::Error;

/// Log sink requested with `-L`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogSpec {
    /// File path, or the special names `stdout` / `stderr`
    pub name: String,
    /// Append instead of truncating (`-A`)
    pub append: bool,
}

/// A validated request to run tests
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Run {
    /// Build root (`-b`), overriding the `BUILD` environment variable
    pub build: Option<String>,
    /// Source root (`-s`), overriding the `SOURCE` environment variable
    pub source: Option<String>,
    /// Test list file (`-l`)
    pub list: Option<PathBuf>,
    /// Tests named directly on the command line
    pub tests: Vec<String>,
    /// Run the one named test directly instead of as a batch (`-o`)
    pub single: bool,
    /// Merge child stderr into the TAP stream (`-e`)
    pub capture_stderr: bool,
    /// Strict TAP interpretation by default (`-S`)
    pub strict: bool,
    /// Retry budget for silent non-blocking reads (`-t`)
    pub blocking_time: u32,
    /// Verbatim log sink (`-L`, `-A`)
    pub log: Option<LogSpec>,
}

impl Default for Run {
    fn default() -> Self {
        Run {
            build: None,
            source: None,
            list: None,
            tests: Vec::new(),
            single: false,
            capture_stderr: false,
            strict: false,
            blocking_time: DEFAULT_BLOCKING_TIME,
            log: None,
        }
    }
}

/// Result of argument parsing
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Parse {
    /// `-h`: print usage and exit successfully.
    Help,
    /// `-V`: print the version and exit successfully.
    Version,
    /// Run tests.
    Run(Run),
}

/// Argument parsing error
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("unknown option -{0}")]
    UnknownOption(char),
    #[error("option -{0} requires an argument")]
    MissingArgument(char),
    #[error("invalid number of seconds {0:?}")]
    InvalidBlockingTime(String),
    #[error("-o takes exactly one test operand")]
    SingleTest,
    #[error("-A is meaningful only with -L")]
    AppendWithoutLog,
    #[error("no tests to run")]
    NoTests,
}

/// Parses the command line, the program name included.
pub fn parse<I>(args: I) -> Result<Parse, Error>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let _program = args.next();

    let mut run = Run::default();
    let mut append = false;
    let mut log_name = None;

    while let Some(arg) = args.next() {
        if arg == "--" {
            run.tests.extend(args);
            break;
        }
        let Some(options) = arg.strip_prefix('-') else {
            run.tests.push(arg);
            continue;
        };
        if options.is_empty() {
            run.tests.push(arg);
            continue;
        }

        let mut chars = options.chars();
        while let Some(option) = chars.next() {
            match option {
                'h' => return Ok(Parse::Help),
                'V' => return Ok(Parse::Version),
                'A' => append = true,
                'e' => run.capture_stderr = true,
                'S' => run.strict = true,
                'o' => run.single = true,
                'b' | 's' | 'l' | 't' | 'L' => {
                    let attached: String = chars.by_ref().collect();
                    let value = if attached.is_empty() {
                        args.next().ok_or(Error::MissingArgument(option))?
                    } else {
                        attached
                    };
                    match option {
                        'b' => run.build = Some(value),
                        's' => run.source = Some(value),
                        'l' => run.list = Some(PathBuf::from(value)),
                        'L' => log_name = Some(value),
                        't' => {
                            run.blocking_time = value
                                .parse()
                                .map_err(|_| Error::InvalidBlockingTime(value.clone()))?;
                        }
                        _ => unreachable!(),
                    }
                }
                other => return Err(Error::UnknownOption(other)),
            }
        }
    }

    if append && log_name.is_none() {
        return Err(Error::AppendWithoutLog);
    }
    run.log = log_name.map(|name| LogSpec { name, append });

    if run.single {
        if run.list.is_some() || run.tests.len() != 1 {
            return Err(Error::SingleTest);
        }
    } else if run.list.is_none() && run.tests.is_empty() {
        return Err(Error::NoTests);
    }

    Ok(Parse::Run(run))
}
