//! # Command Lines (`common::process::command`)
//!
//! File: cli/src/common/process/command.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A command handed to the runner is either a single string or an ordered
//! list of argument tokens. Before spawning, it is resolved into an
//! `Invocation`: the program to execute and its arguments, taking the
//! `use_shell` option into account.
//!
//! | Command    | `use_shell` | Program / arguments                        |
//! |------------|-------------|--------------------------------------------|
//! | `Tokens`   | false       | first token / remaining tokens             |
//! | `Line`     | false       | line split on whitespace, then as above    |
//! | `Line`     | true        | `<shell> <flag> <line>`                    |
//! | `Tokens`   | true        | `<shell> <flag> <tokens joined by spaces>` |
//!
use super::runner::RunOptions;
use crate::core::error::{ProcstreamError, Result};
use std::fmt;

/// A command to run, as given by the caller. Never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// A single command string.
    Line(String),
    /// Program followed by its arguments.
    Tokens(Vec<String>),
}

impl CommandLine {
    /// Argument tokens of the command. A `Line` is split on whitespace.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            CommandLine::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            CommandLine::Tokens(tokens) => tokens.clone(),
        }
    }
}

/// Display form: the line itself, or the tokens joined by single spaces.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Line(line) => f.write_str(line),
            CommandLine::Tokens(tokens) => f.write_str(&tokens.join(" ")),
        }
    }
}

impl From<&str> for CommandLine {
    fn from(line: &str) -> Self {
        CommandLine::Line(line.to_string())
    }
}

impl From<String> for CommandLine {
    fn from(line: String) -> Self {
        CommandLine::Line(line)
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(tokens: Vec<String>) -> Self {
        CommandLine::Tokens(tokens)
    }
}

/// The concrete program and arguments that will be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Resolves `command` against the shell settings in `options`.
    ///
    /// ## Errors
    ///
    /// Returns `ProcstreamError::EmptyCommand` if there is nothing to run.
    pub fn resolve(command: &CommandLine, options: &RunOptions) -> Result<Self> {
        if options.use_shell {
            let script = command.to_string();
            if script.trim().is_empty() {
                return Err(ProcstreamError::EmptyCommand.into());
            }
            return Ok(Self {
                program: options.shell.clone(),
                args: vec![options.shell_flag.clone(), script],
            });
        }

        let mut tokens = command.tokens().into_iter();
        let program = tokens.next().ok_or(ProcstreamError::EmptyCommand)?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }
}
