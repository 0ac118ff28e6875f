// yuvcmp-cli/src/lib.rs
//
// Library portion of the yuvcmp CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, ReportFormat};
pub use commands::analyze::{build_config, run_analyze};
