//! # ProcStream CLI Run Integration Tests
//!
//! File: cli/tests/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `procstream run`: output forwarding from both
//! streams, exit code propagation, shell mode, quiet mode, and settings
//! coming from `.procstream.toml`.
//!
//! **Note:** These tests rely on a POSIX `sh` and are compiled on Unix only.
//!
#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;

/// # Test Run Echo (`test_run_echo`)
///
/// `procstream run echo hello` prints `hello` and exits 0.
#[test]
fn test_run_echo() {
    let project = isolated_project(None);
    procstream_in(project.path())
        .args(["run", "echo", "hello"])
        .assert()
        .success()
        .stdout("hello\n");
}

/// # Test Both Streams Forwarded (`test_run_forwards_stderr_to_stdout`)
///
/// Lines the child writes to stderr show up on procstream's stdout, in order.
#[test]
fn test_run_forwards_stderr_to_stdout() {
    let project = isolated_project(None);
    let assert = procstream_in(project.path())
        .args(["run", "--shell", "--", "echo out; echo err1 >&2; echo err2 >&2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("err1").not());

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output: {stdout:?}");
    assert!(lines.contains(&"out"));
    let err1 = lines.iter().position(|l| *l == "err1").unwrap();
    let err2 = lines.iter().position(|l| *l == "err2").unwrap();
    assert!(err1 < err2, "stderr lines out of order: {stdout:?}");
}

/// # Test Exit Code (`test_run_propagates_exit_code`)
///
/// procstream exits with the child's exit code.
#[test]
fn test_run_propagates_exit_code() {
    let project = isolated_project(None);
    for code in [1, 3, 127] {
        let script = format!("exit {code}");
        procstream_in(project.path())
            .args(["run", "sh", "-c", script.as_str()])
            .assert()
            .code(code);
    }
}

/// # Test Signal Exit (`test_run_signal_exit_status`)
///
/// A child killed by SIGKILL is reported as 128 + 9.
#[test]
fn test_run_signal_exit_status() {
    let project = isolated_project(None);
    procstream_in(project.path())
        .args(["run", "--shell", "--", "kill -9 $$"])
        .assert()
        .code(137);
}

/// # Test Shell Equivalence (`test_run_shell_matches_direct`)
///
/// A shell string and the equivalent token list produce the same output.
#[test]
fn test_run_shell_matches_direct() {
    let project = isolated_project(None);
    let direct = procstream_in(project.path())
        .args(["run", "printf", "%s\\n", "one", "two"])
        .assert()
        .success();
    let shelled = procstream_in(project.path())
        .args(["run", "--shell", "--", "printf '%s\\n' one two"])
        .assert()
        .success();

    assert_eq!(direct.get_output().stdout, b"one\ntwo\n");
    assert_eq!(direct.get_output().stdout, shelled.get_output().stdout);
}

/// # Test Quiet Mode (`test_run_quiet`)
///
/// `--quiet` prints nothing but still reports the exit code.
#[test]
fn test_run_quiet() {
    let project = isolated_project(None);
    procstream_in(project.path())
        .args(["run", "--quiet", "--shell", "--", "echo hidden; echo hidden >&2; exit 2"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

/// # Test Missing Program (`test_run_missing_program`)
///
/// A program that cannot be started is an error, not an exit code.
#[test]
fn test_run_missing_program() {
    let project = isolated_project(None);
    procstream_in(project.path())
        .args(["run", "procstream-test-no-such-program-xyz"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Failed to start 'procstream-test-no-such-program-xyz'",
        ));
}

/// # Test Env Flag (`test_run_env_flag`)
///
/// `-e KEY=VALUE` reaches the child's environment.
#[test]
fn test_run_env_flag() {
    let project = isolated_project(None);
    procstream_in(project.path())
        .args(["run", "-e", "GREETING=from flag", "--shell", "--", "echo \"$GREETING\""])
        .assert()
        .success()
        .stdout("from flag\n");
}

/// # Test Project Config (`test_run_uses_project_config`)
///
/// `[runner]` settings in `.procstream.toml` apply to the run, and a
/// command-line `-e` wins over the configured value.
#[test]
fn test_run_uses_project_config() {
    let project = isolated_project(Some(
        r#"
        [runner.env]
        COLOR = "blue"
        SIZE = "large"
        "#,
    ));
    procstream_in(project.path())
        .args(["run", "-e", "SIZE=small", "--shell", "--", "echo $COLOR $SIZE"])
        .assert()
        .success()
        .stdout("blue small\n");
}

/// # Test Config Quiet (`test_run_config_print_output_false`)
///
/// `print_output = false` in the config silences output.
#[test]
fn test_run_config_print_output_false() {
    let project = isolated_project(Some("[runner]\nprint_output = false\n"));
    procstream_in(project.path())
        .args(["run", "echo", "silent"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

/// # Test Invalid Config (`test_run_invalid_config`)
///
/// An unknown key in `.procstream.toml` stops the run before anything is spawned.
#[test]
fn test_run_invalid_config() {
    let project = isolated_project(Some("[runner]\ntimeout = 10\n"));
    procstream_in(project.path())
        .args(["run", "echo", "never"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to load ProcStream configuration"));
}

/// # Test Invalid UTF-8 (`test_run_invalid_utf8_keeps_exit_code`)
///
/// Undecodable output ends forwarding for that stream only; the exit code
/// is still reported and a diagnostic is logged to stderr.
#[test]
fn test_run_invalid_utf8_keeps_exit_code() {
    let project = isolated_project(None);
    procstream_in(project.path())
        .args(["run", "--shell", "--", "printf 'ok\\n\\377\\n'; echo fine >&2; exit 6"])
        .assert()
        .code(6)
        .stdout(predicate::str::contains("ok\n"))
        .stdout(predicate::str::contains("fine\n"))
        .stderr(predicate::str::contains("### Exception"))
        .stderr(predicate::str::contains("DecodeError"));
}
