//! Stream plumbing behind `LineSource`.
//!
//! This module provides:
//! - `command`: Pipe command parsing and shell routing
//! - `diag`: Helpers writing diagnostics to stderr
//! - the owned stream and its teardown (crate-private)

pub mod command;
pub mod diag;
pub(crate) mod stream;

pub use command::{CommandLine, SHELL_METACHARACTERS, needs_shell};
pub use diag::{eprint, eprint_to, ewrite, ewrite_to};
