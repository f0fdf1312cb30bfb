//! # linesource
//!
//! Read a file, standard input, or the output of a command one line at a
//! time, handing each line to a callback.
//!
//! ## Overview
//!
//! A source is picked from a single spec string:
//! - `"-"` reads the process's standard input
//! - `"<command> |"` runs the command and reads its standard output
//! - anything else is opened as a file path
//!
//! Surrounding whitespace around the spec is ignored.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linesource::{LineSource, ReadError, chop};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut src = LineSource::open("ls /etc |")?;
//!
//!     src.run_loop(false, |_, line| {
//!         let name = chop(&line);
//!         if name.ends_with(".conf") {
//!             println!("{name}");
//!         }
//!         Ok::<_, ReadError>(true)
//!     })?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipe commands
//!
//! A command containing any of `|`, `<`, `>`, `` ` `` or `;` is run as
//! `sh -c "<command>"` so the shell interprets it. Other commands are split
//! with shell quoting rules and executed directly. This routing is a
//! convenience for trusted command strings, not a sandbox.
//!
//! ## Read loop semantics
//!
//! - Every kind of source is decoded as UTF-8 per line; see
//!   [`DecodePolicy`] for what happens to invalid input.
//! - With `strip` set each line is trimmed; otherwise it keeps its trailing
//!   newline, which [`chop`] removes.
//! - A callback returning `false` (or [`Flow::Stop`]) ends the loop with
//!   [`LoopOutcome::Interrupted`]; reaching end of data gives
//!   [`LoopOutcome::Completed`].
//! - Errors returned by the callback propagate out of the loop unchanged.
//!
//! ## Teardown
//!
//! Dropping a [`LineSource`] (or calling [`LineSource::close`]) closes the
//! file, releases stdin without closing it, or sends `SIGTERM` to the child
//! and reaps it.
//!
//! ## Features
//!
//! - `demo` - builds the `print_match` binary (enabled by default)
//! - `miette` - Pretty error reporting with miette

pub mod config;
pub mod error;
pub mod io;
pub mod source;

// Re-exports for convenience
pub use config::{DecodePolicy, ProcessGroup, SourceOptions};
pub use error::{CommandError, OpenError, OpenErrorKind, ReadError};
pub use io::diag::{eprint, ewrite};
pub use source::{
    Flow, LineSource, LoopOutcome, PIPE_MARKER, STDIN_MARKER, SourceInfo, SourceKind, chop,
};

// Miette re-exports
#[cfg(feature = "miette")]
pub use error::SourceDiagnostic;
