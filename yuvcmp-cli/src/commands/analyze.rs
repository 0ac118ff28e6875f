//! Implementation of the analysis command.
//!
//! Resolves the frame geometry, builds the core configuration from the
//! parsed arguments, wires the report and progress handlers and runs the
//! selected analysis.

use crate::cli::{Cli, ReportFormat};
use crate::error::{CliErrorContext, CliResult};
use crate::output;
use crate::progress::ProgressBarHandler;

use yuvcmp_core::config::{AnalysisConfig, AnalysisConfigBuilder, resolve_geometry};
use yuvcmp_core::events::{EventDispatcher, JsonReportHandler, TextReportHandler};
use yuvcmp_core::{AnalysisOutcome, format_duration, run_analysis};

use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Turns parsed arguments into a validated analysis configuration.
pub fn build_config(cli: &Cli) -> CliResult<AnalysisConfig> {
    let mut inputs: Vec<&Path> = vec![cli.input1.as_path()];
    inputs.extend(cli.input2.as_deref());

    let (geometry, source) = resolve_geometry(cli.dimensions()?, &inputs)?;
    debug!("Frame geometry {geometry} ({})", source.as_str());

    let mut builder = AnalysisConfigBuilder::new()
        .input_a(&cli.input1)
        .geometry(geometry, source)
        .mode(cli.mode())
        .window_size(cli.window)
        .skip_frames(cli.skip)
        .verbosity(cli.verbose);
    if let Some(input2) = &cli.input2 {
        builder = builder.input_b(input2);
    }
    builder.build()
}

/// The report handler selected by `--format`.
enum Report {
    Text(Arc<TextReportHandler>),
    Json(Arc<JsonReportHandler>),
}

impl Report {
    fn finish(&self) -> std::io::Result<()> {
        match self {
            Report::Text(handler) => handler.finish(),
            Report::Json(handler) => handler.finish(),
        }
    }
}

/// Runs the analysis described by `cli`, writing the report to stdout.
pub fn run_analyze(cli: Cli) -> CliResult<()> {
    let start_time = Instant::now();
    let config = build_config(&cli)?;

    let mut dispatcher = EventDispatcher::new();
    let report = match cli.format {
        ReportFormat::Text => {
            let handler = Arc::new(TextReportHandler::new(config.verbose()));
            dispatcher.add_handler(handler.clone());
            Report::Text(handler)
        }
        ReportFormat::Json => {
            let handler = Arc::new(JsonReportHandler::new());
            dispatcher.add_handler(handler.clone());
            Report::Json(handler)
        }
    };
    if cli.format == ReportFormat::Text && ProgressBarHandler::should_display() {
        dispatcher.add_handler(Arc::new(ProgressBarHandler::new()));
    }

    let outcome = run_analysis(&config, &dispatcher)?;

    report.finish().cli_context("Failed to write report")?;

    let elapsed = format_duration(start_time.elapsed().as_secs_f64());
    let summary = match &outcome {
        AnalysisOutcome::Compared(frames) => format!("{frames} frame pair(s) compared"),
        AnalysisOutcome::BestMatches(results) => format!("{} best match(es) found", results.len()),
        AnalysisOutcome::Hashed(sequence) => format!("{} frame(s) hashed", sequence.len()),
        AnalysisOutcome::Aligned(result) if result.found() => {
            format!("{} frame(s) aligned", result.match_length)
        }
        AnalysisOutcome::Aligned(_) => "no alignment found".to_string(),
    };
    info!("{} finished in {elapsed}: {summary}", config.mode);
    if config.verbose() {
        output::print_summary("Summary", &format!("{summary} in {elapsed}"));
    }

    Ok(())
}
