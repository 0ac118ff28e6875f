// ============================================================================
// yuvcmp-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core error types
//
// Every fatal condition of the comparison tools maps onto one CoreError
// variant. Expected conditions (end of stream, no alignment found) are not
// errors and never reach this module.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for yuvcmp-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid frame geometry {width}x{height}: {reason}")]
    InvalidGeometry {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    #[error(
        "{} isn't a perfect multiple of frame_size {frame_size} ({file_size} bytes)",
        path.display()
    )]
    TruncatedStream {
        path: PathBuf,
        file_size: u64,
        frame_size: usize,
    },

    #[error(
        "{} ({size_a} bytes) isn't the same size as {} ({size_b} bytes)",
        path_a.display(),
        path_b.display()
    )]
    StreamSizeMismatch {
        path_a: PathBuf,
        size_a: u64,
        path_b: PathBuf,
        size_b: u64,
    },

    #[error(
        "Unable to detect resolution of {}; provide width (-W) and height (-H)",
        .0.display()
    )]
    ResolutionUndetected(PathBuf),

    #[error("Hash sequences differ in length ({len_a} vs {len_b})")]
    SequenceLengthMismatch { len_a: usize, len_b: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for yuvcmp-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
