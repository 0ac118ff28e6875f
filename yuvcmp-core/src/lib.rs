//! Core library for comparing raw planar YUV 4:2:0 video streams.
//!
//! This crate provides resolution detection from file size, sequential frame
//! reading, per-frame error/quality/sharpness/hash metrics, and three stream
//! analyses: lock-step comparison, windowed best-match search and perceptual
//! hash alignment with trimming instructions.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use yuvcmp_core::config::{AnalysisConfigBuilder, AnalysisMode, resolve_geometry};
//! use yuvcmp_core::events::{EventDispatcher, TextReportHandler};
//! use yuvcmp_core::run_analysis;
//!
//! let inputs = [Path::new("capture1.yuv"), Path::new("capture2.yuv")];
//! let (geometry, source) = resolve_geometry(None, &inputs).unwrap();
//!
//! let config = AnalysisConfigBuilder::new()
//!     .input_a(inputs[0])
//!     .input_b(inputs[1])
//!     .geometry(geometry, source)
//!     .mode(AnalysisMode::HashAlign)
//!     .build()
//!     .unwrap();
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.add_handler(Arc::new(TextReportHandler::new(config.verbose())));
//! run_analysis(&config, &dispatcher).unwrap();
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod events;
pub mod frame;
pub mod metrics;
pub mod processing;
pub mod utils;

// Re-exports for public API
pub use config::{AnalysisConfig, AnalysisConfigBuilder, AnalysisMode, DimensionSource};
pub use detection::{ResolutionCandidate, detect_resolution, detect_stream_resolution};
pub use error::{CoreError, CoreResult};
pub use frame::{FrameGeometry, FrameReader, PlanarFrame};
pub use metrics::{Assessment, FrameStats, compute_stats};
pub use processing::{AnalysisOutcome, run_analysis};
pub use utils::{format_bytes, format_duration};
