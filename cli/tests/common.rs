//! # ProcStream CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test files in `cli/tests/`. Each test
//! file that uses them declares `mod common;`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// # Get ProcStream Command (`procstream_cmd`)
///
/// Returns an `assert_cmd::Command` for the `procstream` binary built for
/// this test run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn procstream_cmd() -> Command {
    Command::cargo_bin("procstream").expect("Failed to find procstream binary for testing")
}

/// # ProcStream Command In Directory (`procstream_in`)
///
/// Like `procstream_cmd`, but runs inside `dir` with the user config
/// directory pointed into `dir` as well, so no real user config is loaded.
pub fn procstream_in(dir: &Path) -> Command {
    let mut cmd = procstream_cmd();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg-config"))
        .env_remove("PROCSTREAM_SHELL")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// # Isolated Project Directory (`isolated_project`)
///
/// Creates a temporary directory containing an empty `.git` directory, so the
/// project config search never walks above it. Optionally writes a
/// `.procstream.toml` with the given contents.
pub fn isolated_project(config: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp project dir");
    std::fs::create_dir(dir.path().join(".git")).expect("Failed to create .git marker");
    if let Some(contents) = config {
        write_project_config(dir.path(), contents);
    }
    dir
}

/// Writes `.procstream.toml` into `dir`.
pub fn write_project_config(dir: &Path, contents: &str) {
    std::fs::write(dir.join(".procstream.toml"), contents)
        .expect("Failed to write project config");
}
