// yuvcmp-cli/src/main.rs
//
// Entry point for the yuvcmp binary.
//
// Responsibilities:
// - Parsing user-provided arguments.
// - Initialising env_logger from the -v count (RUST_LOG overrides).
// - Running the selected analysis.
// - Printing errors and setting the exit code.

use clap::Parser;
use std::process;
use yuvcmp_cli::{Cli, logging, output, run_analyze};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run_analyze(cli) {
        output::print_error(&e.to_string());
        process::exit(1);
    }
}
