//! Command implementations for the CLI.

/// Module containing the implementation of the analysis command.
/// Runs compare, best-match or DCT hash alignment over the input files.
pub mod analyze;
