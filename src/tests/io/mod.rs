//! IO module tests.

mod command_tests;
mod diag_tests;
mod stream_tests;
