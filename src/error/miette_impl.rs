//! Miette integration for pretty error reporting.

use miette::{Diagnostic, Severity};
use thiserror::Error;

use super::{OpenError, OpenErrorKind, ReadError};

/// A diagnostic wrapper for line source errors compatible with miette.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SourceDiagnostic {
    /// The error message
    pub message: String,

    #[source]
    /// The underlying error source
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,

    #[help]
    /// Help text for the user
    pub help: Option<String>,

    #[diagnostic(severity)]
    /// Severity level
    pub severity: Severity,
}

impl From<OpenError> for SourceDiagnostic {
    fn from(e: OpenError) -> Self {
        let help = match e.kind {
            OpenErrorKind::FileOpenFailed => "Check that the path exists and is a readable file",
            OpenErrorKind::PipeSpawnFailed => {
                "Check that the command exists and its quoting is balanced"
            }
        };
        SourceDiagnostic {
            message: format!("{} '{}'", e.kind, e.detail),
            source: Some(e.source),
            help: Some(help.into()),
            severity: Severity::Error,
        }
    }
}

impl From<ReadError> for SourceDiagnostic {
    fn from(e: ReadError) -> Self {
        let help = match &e {
            ReadError::Io { .. } => None,
            ReadError::Decode { .. } => {
                Some("Use DecodePolicy::Lossy to replace invalid sequences instead".into())
            }
        };
        SourceDiagnostic {
            message: format!("while reading '{}'", e.spec()),
            source: Some(Box::new(e)),
            help,
            severity: Severity::Error,
        }
    }
}

impl From<OpenError> for miette::Report {
    fn from(e: OpenError) -> Self {
        miette::Report::new(SourceDiagnostic::from(e))
    }
}
