//! compiler-test: embedded compiler acceptance tests.
//!
//! A single annotated source file carries a shared preamble, any number of
//! small tests, and a shared epilogue. This crate parses such files, assembles
//! one compilable unit per test, and generates an executable harness that
//! compiles every unit concurrently and checks each outcome against the test's
//! declared expectation.

pub use crate::diagnostics::{Error, ParseError, Result};

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod harness;
pub mod logging;
pub mod registry;
pub mod syntax;
pub mod test;
