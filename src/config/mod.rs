//! Configuration types for opening line sources.
//!
//! This module provides:
//! - `SourceOptions`: Knobs applied when a source is opened
//! - `DecodePolicy`: What the read loop does with invalid UTF-8
//! - `ProcessGroup`: Where pipe children run and how teardown signals them

mod options;

pub use options::{DecodePolicy, ProcessGroup, SourceOptions};
