//! # Stream Forwarders (`common::process::forward`)
//!
//! File: cli/src/common/process/forward.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A forwarder drains one output pipe of a child process. It reads a line at
//! a time, decodes it as UTF-8, strips the trailing `\r`/`\n` characters and
//! hands the text to an `OutputSink` straight away. A final line without a
//! newline is still forwarded.
//!
//! Any read, decode, or write failure ends that forwarder only. The failure
//! is logged as `### Exception: <kind>: <message>` and the task finishes
//! normally, so the sibling forwarder and the wait on the child carry on.
//!
use super::sink::OutputSink;
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Which pipe of the child a forwarder drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        })
    }
}

/// A failure inside a forwarder. Logged where it happens, never returned to the runner's caller.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("failed reading {stream}: {source}")]
    Read {
        stream: StreamKind,
        #[source]
        source: io::Error,
    },

    #[error("line {line} of {stream} is not valid UTF-8: {source}")]
    Decode {
        stream: StreamKind,
        line: usize,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("failed writing line {line} of {stream}: {source}")]
    Write {
        stream: StreamKind,
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ForwardError {
    /// Short name of the failure class, used as the diagnostic prefix.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::Read { .. } => "ReadError",
            ForwardError::Decode { .. } => "DecodeError",
            ForwardError::Write { .. } => "WriteError",
        }
    }
}

/// Drains one stream into a sink, counting forwarded lines.
pub struct Forwarder {
    stream: StreamKind,
    sink: Arc<dyn OutputSink>,
    lines: usize,
}

impl Forwarder {
    pub fn new(stream: StreamKind, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            stream,
            sink,
            lines: 0,
        }
    }

    /// Number of lines handed to the sink so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Reads `reader` to end-of-stream, forwarding each line.
    ///
    /// Stops forwarding at the first failure and returns it; lines forwarded
    /// before the failure stay counted. The rest of the stream is still read
    /// and thrown away, so a child that keeps writing to the pipe is not
    /// killed by SIGPIPE.
    ///
    /// A line is buffered whole before it is forwarded, so a child writing
    /// one long line without a newline grows the buffer until the newline
    /// or end-of-stream.
    pub async fn drain<R>(&mut self, reader: R) -> Result<(), ForwardError>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let result = self.forward_lines(&mut reader).await;
        if result.is_err() {
            self.discard_rest(&mut reader).await;
        }
        result
    }

    async fn forward_lines<R>(&mut self, reader: &mut BufReader<R>) -> Result<(), ForwardError>
    where
        R: AsyncRead + Unpin,
    {
        let stream = self.stream;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|source| ForwardError::Read { stream, source })?;
            if read == 0 {
                return Ok(());
            }
            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }
            let line_no = self.lines + 1;
            let line = std::str::from_utf8(&buf).map_err(|source| ForwardError::Decode {
                stream,
                line: line_no,
                source,
            })?;
            self.sink
                .emit(stream, line)
                .map_err(|source| ForwardError::Write {
                    stream,
                    line: line_no,
                    source,
                })?;
            self.lines = line_no;
        }
    }

    /// Keeps the pipe open and empty until the child closes it.
    async fn discard_rest<R>(&self, reader: &mut BufReader<R>)
    where
        R: AsyncRead + Unpin,
    {
        match tokio::io::copy(reader, &mut tokio::io::sink()).await {
            Ok(bytes) => debug!("Discarded {} trailing byte(s) of {}", bytes, self.stream),
            Err(err) => debug!("Stopped discarding {}: {}", self.stream, err),
        }
    }

    /// Runs the forwarder on its own task. The task always completes with
    /// the number of lines forwarded; failures are logged, not returned.
    pub fn spawn<R>(mut self, reader: R) -> JoinHandle<usize>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            match self.forward_lines(&mut reader).await {
                Ok(()) => debug!(
                    "{} forwarder reached end of stream after {} line(s)",
                    self.stream, self.lines
                ),
                Err(err) => {
                    error!("### Exception: {}: {}", err.kind(), err);
                    self.discard_rest(&mut reader).await;
                }
            }
            self.lines()
        })
    }
}
