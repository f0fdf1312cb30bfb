//! Tests for error types and their messages.

use std::error::Error;

use crate::error::{CommandError, OpenError, OpenErrorKind, ReadError};

#[test]
fn open_error_display_includes_kind_and_detail() {
    let err = OpenError::file(
        "/no/such/file",
        std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    );

    assert_eq!(err.kind, OpenErrorKind::FileOpenFailed);
    assert!(err.is_file_error());
    assert!(!err.is_pipe_error());
    assert_eq!(err.to_string(), "failed to open file /no/such/file: not found");
    assert!(err.source().is_some());
}

#[test]
fn pipe_error_wraps_command_error() {
    let err = OpenError::pipe("|", CommandError::Empty);

    assert!(err.is_pipe_error());
    assert_eq!(err.detail, "|");
    assert!(err.to_string().contains("empty command"));
}

#[test]
fn read_error_exposes_spec() {
    let bad = String::from_utf8(vec![0xff, b'\n']).unwrap_err();
    let err = ReadError::Decode {
        spec: "data.bin".into(),
        line: 3,
        source: bad,
    };

    assert_eq!(err.spec(), "data.bin");
    assert!(err.to_string().starts_with("line 3 of 'data.bin'"));

    let io = ReadError::Io {
        spec: "-".into(),
        source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"),
    };
    assert_eq!(io.spec(), "-");
}
