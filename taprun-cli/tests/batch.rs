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

//! End-to-end runs of the `taprun` binary against scripted tests

use std::fs::File;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_taprun");

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    write!(file, "#!/bin/sh\n{body}").unwrap();
    file.set_permissions(std::fs::Permissions::from_mode(0o755))
        .unwrap();
}

fn write_file(dir: &Path, name: &str, content: &str) {
    let mut file = File::create(dir.join(name)).unwrap();
    write!(file, "{content}").unwrap();
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .current_dir(dir)
        .env_remove("BUILD")
        .env_remove("SOURCE")
        .output()
        .unwrap()
}

#[test]
fn passing_batch_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "basic-t",
        "echo '1..2'\necho 'ok 1'\necho 'ok 2'\n",
    );
    write_file(dir.path(), "tests.list", "# suite\nbasic\n");

    let output = run(dir.path(), &["-l", "tests.list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout.contains("basic...ok\n"), "{stdout}");
    assert!(stdout.contains("All tests successful.\n"), "{stdout}");
}

#[test]
fn failing_batch_exits_one_with_a_table() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "good-t", "echo '1..1'\necho 'ok 1'\n");
    write_script(
        dir.path(),
        "bad-t",
        "echo '1..2'\necho 'ok 1'\necho 'not ok 2'\n",
    );
    write_file(dir.path(), "tests.list", "good\nbad\n");

    let output = run(dir.path(), &["-l", "tests.list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(stdout.contains("good...ok\n"), "{stdout}");
    assert!(stdout.contains("bad....FAILED 2\n"), "{stdout}");
    assert!(stdout.contains("Failed Set"), "{stdout}");
    assert!(stdout.contains("Failed 1/3 tests, 66.67% okay.\n"), "{stdout}");
}

#[test]
fn tests_may_be_named_as_operands() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "solo-t", "echo '1..1'\necho 'ok 1'\n");

    let output = run(dir.path(), &["solo"]);
    assert!(output.status.success(), "{output:?}");
}

#[test]
fn build_root_is_searched_and_exported() {
    let dir = tempfile::tempdir().unwrap();
    let build = dir.path().join("build");
    std::fs::create_dir(&build).unwrap();
    // The child proves it saw $BUILD by planning on it.
    write_script(
        &build,
        "env-t",
        "echo '1..1'\nif [ -n \"$BUILD\" ]; then echo 'ok 1'; else echo 'not ok 1'; fi\n",
    );
    write_file(dir.path(), "tests.list", "env\n");

    let output = run(dir.path(), &["-b", "build", "-l", "tests.list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("env...ok\n"), "{stdout}");
}

#[test]
fn missing_test_aborts_the_set() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "tests.list", "ghost\n");

    let output = run(dir.path(), &["-l", "tests.list"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(
        stdout.contains("ghost...ABORTED (execution failed -- not found?)\n"),
        "{stdout}"
    );
    assert!(stdout.contains("Aborted 1 test set.\n"), "{stdout}");
}

#[test]
fn log_file_captures_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "basic-t",
        "echo '1..1'\necho '# starting'\necho 'ok 1'\n",
    );

    let output = run(dir.path(), &["-L", "run.log", "basic"]);
    assert!(output.status.success(), "{output:?}");
    let log = std::fs::read_to_string(dir.path().join("run.log")).unwrap();
    assert_eq!(log, "1..1\n# starting\nok 1\n");
}

#[test]
fn single_mode_shows_raw_output() {
    let dir = tempfile::tempdir().unwrap();
    write_script(dir.path(), "solo-t", "echo '1..1'\necho 'ok 1'\n");

    let output = run(dir.path(), &["-o", "solo"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout, "1..1\nok 1\n");
}

#[test]
fn usage_errors_exit_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["-x"]);
    assert_eq!(output.status.code(), Some(2), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown option -x"), "{stderr}");

    let output = run(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2), "{output:?}");
}

#[test]
fn help_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["-h"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: taprun"));

    let output = run(dir.path(), &["-V"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("taprun "));
}
