//! # ProcStream Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the ProcStream CLI so
//! the entry point (`main.rs`) can route parsed arguments to them. Each
//! command defines its own `clap` arguments struct and an async handler.
//!
//! ## Commands
//!
//! - `run`: Run an external command, streaming its output and exiting with its exit code
//!

/// Runs an external command and streams its stdout/stderr to the console.
pub mod run;
