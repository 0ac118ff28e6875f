//! Stream analysis and orchestration.
//!
//! Each submodule implements one analysis over whole streams. They read
//! frames through [`crate::frame::FrameReader`], reduce them with
//! [`crate::metrics`], and emit their findings as events.

/// Lock-step frame-by-frame comparison
pub mod compare;

/// Windowed lowest-error frame search
pub mod best_match;

/// Perceptual-hash sequence alignment
pub mod hash_alignment;

pub use best_match::{BestMatchResult, BestMatchSolver};
pub use compare::compare_streams;
pub use hash_alignment::{
    AlignmentResult, HashSequence, MATCH_TOLERANCE, TrimInstruction, align_streams,
    build_hash_sequence, find_longest_match,
};

use crate::config::{AnalysisConfig, AnalysisMode};
use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};

use log::info;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Number of frame pairs compared.
    Compared(u64),
    BestMatches(Vec<BestMatchResult>),
    /// Hash-only run over a single stream.
    Hashed(HashSequence),
    Aligned(AlignmentResult),
}

/// Runs the analysis selected by `config`, reporting through `dispatcher`.
pub fn run_analysis(
    config: &AnalysisConfig,
    dispatcher: &EventDispatcher,
) -> CoreResult<AnalysisOutcome> {
    config.validate()?;

    dispatcher.emit(Event::RunConfigured {
        geometry: config.geometry,
        dimension_source: config.dimension_source,
        inputs: config.inputs().map(|p| p.to_path_buf()).collect(),
        mode: config.mode,
        window_size: config.window_size,
        skip_frames: config.skip_frames,
        verbosity: config.verbosity,
    });

    info!(
        "Running {} analysis at {} ({} bytes per frame)",
        config.mode,
        config.geometry,
        crate::utils::format_bytes(config.geometry.frame_size() as u64)
    );

    let second = || {
        config
            .input_b
            .as_deref()
            .ok_or_else(|| CoreError::Config(format!("{} mode needs two input files", config.mode)))
    };

    match config.mode {
        AnalysisMode::Compare => {
            let frames =
                compare_streams(&config.input_a, second()?, config.geometry, dispatcher)?;
            Ok(AnalysisOutcome::Compared(frames))
        }
        AnalysisMode::BestMatch => {
            let solver = BestMatchSolver::new(config.geometry)
                .skip_frames(config.skip_frames)
                .window_size(config.window_size)
                .verbose(config.verbose());
            let results = solver.run(&config.input_a, second()?, dispatcher)?;
            Ok(AnalysisOutcome::BestMatches(results))
        }
        AnalysisMode::HashAlign => match config.input_b.as_deref() {
            Some(input_b) => {
                let result = align_streams(
                    &config.input_a,
                    input_b,
                    config.geometry,
                    config.skip_frames,
                    config.window_size,
                    dispatcher,
                )?;
                Ok(AnalysisOutcome::Aligned(result))
            }
            None => {
                let sequence = build_hash_sequence(
                    &config.input_a,
                    config.geometry,
                    config.skip_frames,
                    config.window_size,
                    dispatcher,
                )?;
                Ok(AnalysisOutcome::Hashed(sequence))
            }
        },
    }
}
