//! # Output Sinks (`common::process::sink`)
//!
//! File: cli/src/common/process/sink.rs
//! Author: Christi Mahu
//!
//! Destinations for the lines produced by the stream forwarders. The runner
//! uses `ConsoleSink` when printing is enabled and `DiscardSink` otherwise;
//! the pipes are drained either way.

use super::forward::StreamKind;
use std::io::{self, Write};

/// Receives each decoded line from a forwarder.
///
/// Implementations are shared by both forwarders at once, so they must be
/// `Send + Sync`. An `Err` ends the forwarder that called it.
pub trait OutputSink: Send + Sync {
    fn emit(&self, stream: StreamKind, line: &str) -> io::Result<()>;
}

/// Writes every line, from either stream, to this process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, _stream: StreamKind, line: &str) -> io::Result<()> {
        // One lock per line: lines from the two streams never tear.
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()
    }
}

/// Drops every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl OutputSink for DiscardSink {
    fn emit(&self, _stream: StreamKind, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Records lines in arrival order, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: std::sync::Mutex<Vec<(StreamKind, String)>>,
}

#[cfg(test)]
impl MemorySink {
    pub fn lines(&self) -> Vec<(StreamKind, String)> {
        self.lines.lock().expect("memory sink poisoned").clone()
    }

    pub fn lines_from(&self, stream: StreamKind) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line)
            .collect()
    }
}

#[cfg(test)]
impl OutputSink for MemorySink {
    fn emit(&self, stream: StreamKind, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .expect("memory sink poisoned")
            .push((stream, line.to_string()));
        Ok(())
    }
}
