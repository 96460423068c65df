//! # ProcStream Run Command Handler
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements `procstream run`. It launches the given command,
//! prints the command's stdout and stderr lines to stdout as they are
//! produced, and hands the command's exit code back to `main`, which exits
//! with it.
//!
//! ## Architecture
//!
//! 1. Parse command-line arguments (`RunArgs`) using `clap`.
//! 2. Load the configuration (`core::config`) and turn its `[runner]` section into `RunOptions`.
//! 3. Apply command-line overrides (`--shell`, `--shell-program`, `--quiet`, `--cwd`, `--env`).
//! 4. Call `common::process::run` and return its exit code.
//!
//! ## Usage
//!
//! ```bash
//! # Run a program directly
//! procstream run cargo build --release
//!
//! # Run through the shell (sh -c by default)
//! procstream run --shell -- 'make && make test'
//!
//! # Drain output silently, only the exit code matters
//! procstream run --quiet -- ./long-job.sh
//!
//! # Extra environment and working directory for the child
//! procstream run -e RUST_LOG=debug --cwd ~/src/app -- cargo test
//! ```
//!
use crate::{
    common::process::{self, CommandLine, RunOptions},
    core::{config, error::Result},
};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// # Run Arguments (`RunArgs`)
///
/// Defines the command-line arguments accepted by `procstream run`.
#[derive(Parser, Debug)]
#[command(
    about = "Run a command, streaming its output, and exit with its exit code",
    long_about = "Launches the command with its stdout and stderr piped, prints every line from both \
                  streams to stdout as it arrives, and exits with the command's exit code."
)]
pub struct RunArgs {
    /// Interpret the command with a shell (`sh -c` by default).
    #[arg(short, long)]
    shell: bool,

    /// Shell program used with `--shell`. Overrides `runner.shell` from the config.
    #[arg(long, env = "PROCSTREAM_SHELL", value_name = "PROGRAM")]
    shell_program: Option<String>,

    /// Do not print the command's output. The output is still read to completion.
    #[arg(short, long)]
    quiet: bool,

    /// Working directory for the command.
    #[arg(long, value_name = "DIR")]
    cwd: Option<PathBuf>,

    /// Extra environment variable for the command. May be repeated.
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// The command and its arguments.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Parses a `KEY=VALUE` pair for `--env`.
fn parse_env_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Builds the run options from the loaded `[runner]` config and the command-line flags.
fn build_options(args: &RunArgs, base: RunOptions) -> RunOptions {
    let mut options = base;
    options.use_shell = args.shell;
    if args.quiet {
        options.print_output = false;
    }
    if let Some(program) = &args.shell_program {
        options.shell = program.clone();
    }
    if let Some(dir) = &args.cwd {
        options.working_dir = Some(dir.clone());
    }
    options.env.extend(args.env.iter().cloned());
    options
}

/// A single argument under `--shell` is taken as the whole script.
fn build_command_line(args: &RunArgs) -> CommandLine {
    match args.command.as_slice() {
        [script] if args.shell => CommandLine::from(script.clone()),
        tokens => CommandLine::Tokens(tokens.to_vec()),
    }
}

/// # Handle Run Command (`handle_run`)
///
/// Runs the requested command and returns its exit code. Errors are returned
/// only when the command could not be run at all (bad configuration, empty
/// command, spawn failure); a command that runs and fails is reported through
/// its exit code.
pub async fn handle_run(args: RunArgs) -> Result<i32> {
    debug!("Run args: {:?}", args);

    let cfg = config::load_config().context("Failed to load ProcStream configuration")?;
    let options = build_options(&args, RunOptions::from(&cfg.runner));
    let command = build_command_line(&args);

    process::run(&command, &options)
        .await
        .with_context(|| format!("Failed to run '{}'", command))
}

/// Maps a child exit code onto a status this process can exit with.
/// A signal-terminated child (`-N`) becomes `128 + N`, as shells report it.
pub fn to_process_exit_status(code: i32) -> i32 {
    if code < 0 {
        128i32.saturating_add(code.saturating_neg())
    } else {
        code
    }
}
