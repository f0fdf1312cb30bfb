//! LineSource tests.

mod chop_tests;
mod loop_tests;
