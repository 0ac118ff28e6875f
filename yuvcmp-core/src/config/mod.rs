//! Configuration structures and constants for the yuvcmp-core library.
//!
//! An [`AnalysisConfig`] value carries everything one run needs: the input
//! streams, their geometry, the search window and the selected mode. It is
//! built once (usually through [`AnalysisConfigBuilder`]) and handed to
//! [`crate::processing::run_analysis`]; no component keeps global state.

mod builder;

pub use builder::AnalysisConfigBuilder;

use crate::detection::detect_stream_resolution;
use crate::error::{CoreError, CoreResult};
use crate::frame::FrameGeometry;

use std::fmt;
use std::path::{Path, PathBuf};

// Default constants

/// Default number of frames searched or hashed per stream.
pub const DEFAULT_WINDOW_SIZE: u64 = 30;

/// Default number of leading frames skipped in the first stream.
pub const DEFAULT_SKIP_FRAMES: u64 = 0;

/// Which analysis a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Frame-by-frame statistics over two equally long streams.
    #[default]
    Compare,
    /// Windowed search for the lowest-error frame of the second stream.
    BestMatch,
    /// Perceptual-hash alignment with trimming instructions.
    HashAlign,
}

impl AnalysisMode {
    /// Whether the mode needs a second input stream.
    #[must_use]
    pub fn requires_pair(&self) -> bool {
        !matches!(self, AnalysisMode::HashAlign)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Compare => "compare",
            AnalysisMode::BestMatch => "bestmatch",
            AnalysisMode::HashAlign => "dcthash",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the frame dimensions of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionSource {
    UserSupplied,
    Detected,
}

impl DimensionSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionSource::UserSupplied => "user supplied",
            DimensionSource::Detected => "autodetected",
        }
    }
}

/// Complete configuration of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// First input stream ("file 1")
    pub input_a: PathBuf,

    /// Second input stream ("file 2"); optional only for hash alignment
    pub input_b: Option<PathBuf>,

    /// Frame dimensions shared by both streams
    pub geometry: FrameGeometry,

    /// Whether `geometry` was given or detected
    pub dimension_source: DimensionSource,

    /// Leading frames to skip before analysis starts
    pub skip_frames: u64,

    /// Frames analysed after the skip point, and the search depth into the
    /// second stream in best-match mode
    pub window_size: u64,

    pub mode: AnalysisMode,

    /// 0 is quiet; 1 and up adds per-pair and per-hash report lines
    pub verbosity: u8,
}

impl AnalysisConfig {
    /// Checks the cross-field invariants of the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.mode.requires_pair() && self.input_b.is_none() {
            return Err(CoreError::Config(format!(
                "{} mode needs two input files",
                self.mode
            )));
        }
        if self.window_size == 0 {
            return Err(CoreError::Config(
                "window size must be at least one frame".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.verbosity > 0
    }

    /// The configured inputs in order.
    pub fn inputs(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.input_a.as_path()).chain(self.input_b.as_deref())
    }
}

/// Settles the frame geometry for a run.
///
/// Explicit dimensions always win. Otherwise every input must be detected
/// unambiguously and all detections must agree.
pub fn resolve_geometry(
    explicit: Option<(usize, usize)>,
    inputs: &[&Path],
) -> CoreResult<(FrameGeometry, DimensionSource)> {
    if let Some((width, height)) = explicit {
        return Ok((FrameGeometry::new(width, height)?, DimensionSource::UserSupplied));
    }

    let mut detected: Option<FrameGeometry> = None;
    for path in inputs {
        let candidate = detect_stream_resolution(path)?
            .ok_or_else(|| CoreError::ResolutionUndetected(path.to_path_buf()))?;
        let geometry = candidate.geometry()?;

        match detected {
            Some(previous) if previous != geometry => {
                return Err(CoreError::Config(format!(
                    "inputs were detected with different resolutions ({previous} and {geometry})"
                )));
            }
            _ => detected = Some(geometry),
        }
    }

    detected
        .map(|geometry| (geometry, DimensionSource::Detected))
        .ok_or_else(|| CoreError::Config("no input files given".to_string()))
}
