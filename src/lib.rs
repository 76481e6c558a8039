//! # checker
//!
//! A build-and-diff autograder for command-line C assignments: builds the
//! submission with `make`, checks its coding style, runs it against fixed
//! input/reference pairs (optionally under valgrind) and prints a score out
//! of 100.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Orchestrates a full checker run
pub mod checker;
/// Paths and run options
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// For all things related to grading
pub mod grade;
/// Build and clean steps
pub mod make;
/// Valgrind invocation and log parsing
pub mod memcheck;
/// Subprocess helpers
pub mod process;

pub use checker::Checker;
pub use config::{CheckerPaths, RunConfig, Selection};
pub use make::SetupError;
