//! # Process Runner (`common::process::runner`)
//!
//! File: cli/src/common/process/runner.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Launches a command with piped stdout and stderr, forwards both streams
//! line by line while the child runs, and returns the child's exit code.
//!
//! ## Workflow
//!
//! 1. Resolve the `CommandLine` into a program and arguments (`Invocation`).
//! 2. Spawn the child. Spawn failures are returned as `ProcstreamError::Spawn`.
//! 3. Start one `Forwarder` task per pipe, both feeding the same sink.
//! 4. Await both forwarder tasks, then await the child's exit.
//! 5. Map the exit status to an integer code.
//!
//! The call never returns while either pipe is still being drained or the
//! child is still running. There is no timeout.
//!
use super::command::{CommandLine, Invocation};
use super::forward::{Forwarder, StreamKind};
use super::sink::{ConsoleSink, DiscardSink, OutputSink};
use crate::core::config::RunnerConfig;
use crate::core::error::{ProcstreamError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Options controlling a single `run` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Print forwarded lines to stdout. When false the pipes are still drained.
    pub print_output: bool,
    /// Pass the command to `shell` instead of executing it directly.
    pub use_shell: bool,
    pub shell: String,
    pub shell_flag: String,
    /// Working directory for the child. Inherited when `None`.
    pub working_dir: Option<PathBuf>,
    /// Added to the inherited environment.
    pub env: HashMap<String, String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&RunnerConfig::default())
    }
}

impl From<&RunnerConfig> for RunOptions {
    fn from(cfg: &RunnerConfig) -> Self {
        Self {
            print_output: cfg.print_output,
            use_shell: false,
            shell: cfg.shell.clone(),
            shell_flag: cfg.shell_flag.clone(),
            working_dir: cfg.working_dir.as_ref().map(PathBuf::from),
            env: cfg.env.clone(),
        }
    }
}

/// Runs `command`, streaming its output to the console, and returns its exit code.
///
/// Lines go to stdout when `options.print_output` is set and are discarded otherwise.
///
/// ## Errors
///
/// * `ProcstreamError::EmptyCommand` if there is nothing to run.
/// * `ProcstreamError::Spawn` if the process cannot be started.
/// * `ProcstreamError::Wait` if waiting for the process fails.
///
/// Failures while forwarding output are logged and never returned.
pub async fn run(command: &CommandLine, options: &RunOptions) -> Result<i32> {
    let sink: Arc<dyn OutputSink> = if options.print_output {
        Arc::new(ConsoleSink)
    } else {
        Arc::new(DiscardSink)
    };
    run_with_sink(command, options, sink).await
}

/// Same as [`run`], but forwards lines to `sink` regardless of `options.print_output`.
pub async fn run_with_sink(
    command: &CommandLine,
    options: &RunOptions,
    sink: Arc<dyn OutputSink>,
) -> Result<i32> {
    let invocation = Invocation::resolve(command, options)?;
    info!("Running command: {}", command);
    debug!(
        "Spawning '{}' with args {:?} (shell: {}, cwd: {:?})",
        invocation.program, invocation.args, options.use_shell, options.working_dir
    );

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .envs(&options.env)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &options.working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|source| ProcstreamError::Spawn {
        program: invocation.program.clone(),
        source,
    })?;

    let stdout_task = child
        .stdout
        .take()
        .map(|pipe| Forwarder::new(StreamKind::Stdout, Arc::clone(&sink)).spawn(pipe));
    let stderr_task = child
        .stderr
        .take()
        .map(|pipe| Forwarder::new(StreamKind::Stderr, Arc::clone(&sink)).spawn(pipe));

    let (stdout_lines, stderr_lines) = tokio::join!(
        join_forwarder(stdout_task, StreamKind::Stdout),
        join_forwarder(stderr_task, StreamKind::Stderr)
    );

    let status = child.wait().await.map_err(|source| ProcstreamError::Wait {
        command: command.to_string(),
        source,
    })?;
    let code = exit_code(status);
    info!(
        "Command exited with code {} ({} stdout line(s), {} stderr line(s))",
        code, stdout_lines, stderr_lines
    );
    Ok(code)
}

/// Waits for a forwarder task. A panicked or cancelled task counts as zero lines.
async fn join_forwarder(task: Option<JoinHandle<usize>>, stream: StreamKind) -> usize {
    let Some(task) = task else {
        return 0;
    };
    match task.await {
        Ok(lines) => lines,
        Err(err) => {
            let kind = if err.is_panic() { "Panic" } else { "Cancelled" };
            error!("### Exception: {}: {} forwarder task failed: {}", kind, stream, err);
            0
        }
    }
}

/// Integer code for an exit status. A Unix child killed by signal `N` reports `-N`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
