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

//! Child process supervision
//!
//! [`spawn`] starts one test program with its stdout connected to an
//! anonymous pipe and returns the read end together with the child
//! process ID; [`reap`] collects the exit disposition. Between fork and
//! exec the child reports its own setup failures through the reserved
//! exit codes below, which the analyzer translates back into canned
//! diagnostics. The codes sit above the range test programs use in
//! practice.

use crate::context::Context;
use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execv, fork, pipe};
use std::ffi::{CStr, CString};
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Child exit code: duplicating descriptors onto stdout/stderr failed.
pub const CHILD_DUP_FAILED: i32 = 100;

/// Child exit code: exec of the test program failed.
pub const CHILD_EXEC_FAILED: i32 = 101;

/// Child exit code: `/dev/null` could not be opened for stderr.
pub const CHILD_NULL_FAILED: i32 = 102;

/// Starts a test program with its stdout piped back to the caller.
///
/// The child's stderr is merged into the pipe when
/// [`capture_stderr`](Context::capture_stderr) is set and discarded to
/// `/dev/null` otherwise. The returned read end is non-blocking, ready
/// for the [`LineReader`](crate::reader::LineReader); the caller must
/// eventually [`reap`] the returned process ID.
///
/// An error here means the pipe or fork itself failed, which is fatal
/// to the whole batch.
pub fn spawn(path: &Path, context: &Context) -> Result<(OwnedFd, Pid), Errno> {
    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| Errno::EILSEQ)?;

    let (read_end, write_end) = pipe()?;
    // SAFETY: the harness is single-threaded, and the child calls only
    // async-signal-safe functions before exec.
    match unsafe { fork()? } {
        ForkResult::Parent { child } => {
            drop(write_end);
            set_nonblocking(&read_end)?;
            Ok((read_end, child))
        }
        ForkResult::Child => {
            drop(read_end);
            exec_child(&c_path, &write_end, context.capture_stderr)
        }
    }
}

/// Redirects the child's standard streams and execs the test program.
///
/// Runs in the forked child; never returns. Failures are reported to
/// the parent through the reserved exit codes.
fn exec_child(path: &CStr, pipe: &OwnedFd, capture_stderr: bool) -> ! {
    use nix::libc;

    let pipe = pipe.as_raw_fd();
    if unsafe { libc::dup2(pipe, libc::STDOUT_FILENO) } < 0 {
        std::process::exit(CHILD_DUP_FAILED);
    }
    if capture_stderr {
        if unsafe { libc::dup2(pipe, libc::STDERR_FILENO) } < 0 {
            std::process::exit(CHILD_DUP_FAILED);
        }
    } else {
        let null = unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY) };
        if null < 0 {
            std::process::exit(CHILD_NULL_FAILED);
        }
        if unsafe { libc::dup2(null, libc::STDERR_FILENO) } < 0 {
            std::process::exit(CHILD_DUP_FAILED);
        }
    }

    let _ = execv(path, &[path]);
    std::process::exit(CHILD_EXEC_FAILED);
}

/// Waits for the child and returns its exit disposition.
pub fn reap(pid: Pid) -> Result<WaitStatus, Errno> {
    loop {
        match waitpid(pid, None) {
            Err(Errno::EINTR) => {}
            other => return other,
        }
    }
}

/// Sets the `O_NONBLOCK` flag on a descriptor.
pub(crate) fn set_nonblocking(fd: &OwnedFd) -> Result<(), Errno> {
    use nix::libc;

    let raw = fd.as_raw_fd();
    let flags = unsafe { libc::fcntl(raw, libc::F_GETFL) };
    if flags < 0 {
        return Err(Errno::last());
    }
    if flags & libc::O_NONBLOCK == 0
        && unsafe { libc::fcntl(raw, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0
    {
        return Err(Errno::last());
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::fs::File;
    use std::io::Write as _;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Writes an executable `/bin/sh` script for spawning in tests.
    pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "#!/bin/sh\n{body}").unwrap();
        file.set_permissions(std::fs::Permissions::from_mode(0o755))
            .unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::testing::write_script;
    use super::*;
    use crate::reader::{LineReader, Read};
    use assert_matches::assert_matches;

    fn read_all(fd: OwnedFd, context: &Context) -> String {
        let mut reader = LineReader::new(fd);
        let mut output = String::new();
        loop {
            match reader.next_line(context).unwrap() {
                Read::Line(line) => output.push_str(&line),
                Read::Eof(rest) => {
                    output.push_str(&rest);
                    return output;
                }
            }
        }
    }

    #[test]
    fn spawn_pipes_child_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "ok-t", "echo '1..1'\necho 'ok 1'\n");
        let context = Context::default();

        let (fd, pid) = spawn(&script, &context).unwrap();
        assert_eq!(read_all(fd, &context), "1..1\nok 1\n");
        assert_matches!(reap(pid), Ok(WaitStatus::Exited(p, 0)) if p == pid);
    }

    #[test]
    fn exec_failure_reports_the_reserved_code() {
        let dir = tempfile::tempdir().unwrap();
        let context = Context::default();

        let (fd, pid) = spawn(&dir.path().join("missing"), &context).unwrap();
        assert_eq!(read_all(fd, &context), "");
        assert_matches!(reap(pid), Ok(WaitStatus::Exited(_, CHILD_EXEC_FAILED)));
    }

    #[test]
    fn stderr_is_discarded_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "noisy-t", "echo noise >&2\necho 'ok'\n");
        let context = Context::default();

        let (fd, pid) = spawn(&script, &context).unwrap();
        assert_eq!(read_all(fd, &context), "ok\n");
        reap(pid).unwrap();
    }

    #[test]
    fn stderr_is_merged_when_captured() {
        let dir = tempfile::tempdir().unwrap();
        // Order across the two streams is only defined because the
        // shell runs the commands sequentially on the same pipe.
        let script = write_script(dir.path(), "noisy-t", "echo noise >&2\necho 'ok'\n");
        let context = Context {
            capture_stderr: true,
            ..Context::default()
        };

        let (fd, pid) = spawn(&script, &context).unwrap();
        assert_eq!(read_all(fd, &context), "noise\nok\n");
        reap(pid).unwrap();
    }

    #[test]
    fn nonzero_exit_is_observable() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "bad-t", "exit 3\n");
        let context = Context::default();

        let (fd, pid) = spawn(&script, &context).unwrap();
        drop(fd);
        assert_matches!(reap(pid), Ok(WaitStatus::Exited(_, 3)));
    }

    #[test]
    fn signal_death_is_observable() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "sig-t", "kill -TERM $$\n");
        let context = Context::default();

        let (fd, pid) = spawn(&script, &context).unwrap();
        drop(fd);
        assert_matches!(
            reap(pid),
            Ok(WaitStatus::Signaled(_, nix::sys::signal::Signal::SIGTERM, _))
        );
    }
}
