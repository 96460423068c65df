//! # ProcStream Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared utilities used by the command handlers in `commands::`, kept apart
//! from the core infrastructure in `core::`.
//!
//! - **`process`**: Spawning external commands, streaming their stdout and
//!   stderr to the console, and reporting their exit codes.
//!

/// Utilities for executing external processes and streaming their output.
pub mod process;
