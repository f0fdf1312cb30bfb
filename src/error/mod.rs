//! Error types for opening and reading line sources.
//!
//! This module provides:
//! - `OpenErrorKind`: Which kind of source failed to open
//! - `OpenError`: A construction failure with the offending spec attached
//! - `ReadError`: A failure while the read loop pulls lines from the stream
//! - `CommandError`: A pipe command string that cannot be turned into argv

use std::fmt;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Which kind of source failed to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenErrorKind {
    /// The path could not be opened for reading
    FileOpenFailed,
    /// The command could not be parsed or the process could not be started
    PipeSpawnFailed,
}

impl fmt::Display for OpenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenErrorKind::FileOpenFailed => write!(f, "failed to open file"),
            OpenErrorKind::PipeSpawnFailed => write!(f, "failed to open pipe from"),
        }
    }
}

/// Returned by `LineSource::open` when no usable stream could be produced.
///
/// No partially opened source exists when this is returned; there is
/// nothing left to close.
#[derive(Debug)]
pub struct OpenError {
    pub kind: OpenErrorKind,
    /// The path or the source spec that failed
    pub detail: String,
    /// The underlying error
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl OpenError {
    pub(crate) fn file(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind: OpenErrorKind::FileOpenFailed,
            detail: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn pipe(
        spec: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind: OpenErrorKind::PipeSpawnFailed,
            detail: spec.into(),
            source: source.into(),
        }
    }

    /// True when a file path could not be opened.
    pub fn is_file_error(&self) -> bool {
        self.kind == OpenErrorKind::FileOpenFailed
    }

    /// True when a pipe command could not be parsed or started.
    pub fn is_pipe_error(&self) -> bool {
        self.kind == OpenErrorKind::PipeSpawnFailed
    }
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.detail, self.source)
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Errors raised by the read loop itself.
///
/// Callback errors are not wrapped here; they travel through the loop in the
/// caller's own error type, which only has to absorb `ReadError` via `From`.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read error on '{spec}': {source}")]
    Io {
        spec: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line} of '{spec}' is not valid UTF-8: {source}")]
    Decode {
        spec: String,
        /// 1-based line number
        line: usize,
        #[source]
        source: FromUtf8Error,
    },
}

impl ReadError {
    /// The source spec the failing read came from.
    pub fn spec(&self) -> &str {
        match self {
            ReadError::Io { spec, .. } | ReadError::Decode { spec, .. } => spec,
        }
    }
}

/// Errors from turning a pipe command string into a program and arguments.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("cannot split command: {0}")]
    Quoting(#[from] shell_words::ParseError),
}

#[cfg(feature = "miette")]
mod miette_impl;

#[cfg(feature = "miette")]
pub use miette_impl::*;
