//! Run events and their dispatch.
//!
//! The solvers never print. They emit [`Event`] values through an
//! [`EventDispatcher`], and each registered [`EventHandler`] renders the
//! ones it cares about: the fixed-width text report, JSON lines, or a
//! terminal progress bar living in the CLI.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{AnalysisMode, DimensionSource};
use crate::frame::FrameGeometry;
use crate::metrics::FrameStats;
use crate::processing::{AlignmentResult, BestMatchResult, TrimInstruction};

pub mod json_handler;
pub mod text_handler;

pub use json_handler::JsonReportHandler;
pub use text_handler::{HEADER_INTERVAL, TextReportHandler};

/// Long-running phases that report progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compare,
    BestMatch,
    Hashing,
}

impl Stage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compare => "compare",
            Stage::BestMatch => "bestmatch",
            Stage::Hashing => "hashing",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    // Run setup
    RunConfigured {
        geometry: FrameGeometry,
        dimension_source: DimensionSource,
        inputs: Vec<PathBuf>,
        mode: AnalysisMode,
        window_size: u64,
        skip_frames: u64,
        verbosity: u8,
    },

    // Progress events
    StageStarted {
        stage: Stage,
        total: u64,
        message: String,
    },
    StageProgress {
        stage: Stage,
        current: u64,
        total: u64,
    },
    StageComplete {
        stage: Stage,
    },

    // Pairwise comparison
    FrameCompared {
        index: u64,
        stats: FrameStats,
    },

    // Best-match search
    PairScanned {
        anchor_index: u64,
        candidate_index: u64,
        stats: FrameStats,
    },
    BestMatchFound(BestMatchResult),

    // Hash alignment
    FrameHashed {
        source: PathBuf,
        index: u64,
        hash: u64,
        sharpness: f64,
    },
    AlignmentComplete {
        result: AlignmentResult,
        matched_hashes: Vec<u64>,
        trims: Vec<TrimInstruction>,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
