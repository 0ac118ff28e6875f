// ============================================================================
// yuvcmp-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger initialisation
//
// Diagnostics go to stderr through the `log` facade so stdout carries only
// the report. The -v count picks the default level:
// - 0: warn
// - 1: info (detected resolutions, alignment summary)
// - 2: debug (reader and solver details)
// - 3 and up: trace (DCT blocks and hash thresholds)
//
// RUST_LOG, when set, overrides the level chosen here.

use log::LevelFilter;

/// Default log level for a given number of -v flags.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the global logger. Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let default_level = level_for_verbosity(verbosity).to_string().to_lowercase();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
