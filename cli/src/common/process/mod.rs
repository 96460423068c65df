//! # ProcStream Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module runs external commands and streams their output to the
//! console while they run. It wraps `tokio::process::Command` and drains the
//! child's stdout and stderr concurrently, one forwarder task per pipe, so
//! neither pipe can fill up and stall the child.
//!
//! ## Architecture
//!
//! - **`command`**: `CommandLine` (a string or a token list) and its
//!   resolution into a program plus arguments, with optional shell wrapping.
//! - **`forward`**: `Forwarder`, which reads one pipe line by line and hands
//!   decoded lines to a sink. Failures end only that forwarder.
//! - **`sink`**: `OutputSink` and its console/discard implementations.
//! - **`runner`**: `run` / `run_with_sink`, tying the pieces together and
//!   returning the child's exit code.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{self, CommandLine, RunOptions};
//! use crate::core::error::Result;
//!
//! # async fn run_example() -> Result<()> {
//! let command = CommandLine::Tokens(vec!["cargo".into(), "build".into()]);
//! let code = process::run(&command, &RunOptions::default()).await?;
//! if code != 0 {
//!     eprintln!("build failed with exit code {code}");
//! }
//!
//! // Through the shell instead
//! let options = RunOptions { use_shell: true, ..Default::default() };
//! process::run(&CommandLine::from("make -j4 && make test"), &options).await?;
//! # Ok(())
//! # }
//! ```
//!

/// Command lines and their resolution into program + arguments.
pub mod command;
/// Per-pipe line forwarders.
pub mod forward;
/// Process spawning, waiting, and exit code mapping.
pub mod runner;
/// Destinations for forwarded lines.
pub mod sink;

pub use command::CommandLine;
pub use runner::{run, RunOptions};
