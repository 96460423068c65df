//! # ProcStream Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout the ProcStream
//! application. Errors that reach the caller of the process runner, or the
//! user at the command line, are expressed as `ProcstreamError` variants and
//! carried inside `anyhow::Error` so handlers can attach context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ProcstreamError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! Failures inside a stream forwarder are deliberately *not* part of this
//! enum. They are represented by `common::process::ForwardError`, logged
//! where they happen, and never reach the caller.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if tokens.is_empty() {
//!     return Err(ProcstreamError::EmptyCommand)?;
//! }
//!
//! // Checking for a spawn failure
//! match result {
//!     Err(e) if e.downcast_ref::<ProcstreamError>().map_or(false, |pe| matches!(pe, ProcstreamError::Spawn { .. })) => {
//!         eprintln!("Could not start the command");
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the ProcStream application.
#[derive(Error, Debug)]
pub enum ProcstreamError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No command given to run.")]
    EmptyCommand,

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for '{command}' to exit: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
