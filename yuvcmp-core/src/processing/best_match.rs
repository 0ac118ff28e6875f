// ============================================================================
// yuvcmp-core/src/processing/best_match.rs
// ============================================================================
//
// BEST-MATCH SOLVER: Lowest luma error search within a frame window
//
// KEY COMPONENTS:
// - BestMatchSolver: builder-style parameters plus the search loop
// - BestMatchResult: the winning candidate for one anchor frame
//
// ALGORITHM:
// Anchors are the frames of the first stream in [skip, skip + window). For
// every anchor the second stream is opened afresh and its first `window`
// frames are scanned; the lowest luma MSE wins, ties going to the earliest
// candidate. The scan never follows the anchor position, so a constant
// offset between the streams shows up as a steady best_frame_index.

use crate::config::{DEFAULT_SKIP_FRAMES, DEFAULT_WINDOW_SIZE};
use crate::error::CoreResult;
use crate::events::{Event, EventDispatcher, Stage};
use crate::frame::{FrameGeometry, FrameReader, PlanarFrame, ensure_same_size};
use crate::metrics::{compute_stats, luma_mse};

use log::{debug, warn};
use std::path::Path;

/// Winning candidate for one anchor frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatchResult {
    /// Absolute frame index in the first stream
    pub anchor_index: u64,
    /// Frame index in the second stream with the lowest luma error
    pub best_frame_index: u64,
    pub min_y_mse: f64,
}

/// Windowed best-match search between two streams.
#[derive(Debug, Clone)]
pub struct BestMatchSolver {
    geometry: FrameGeometry,
    skip_frames: u64,
    window_size: u64,
    verbose: bool,
}

impl BestMatchSolver {
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            skip_frames: DEFAULT_SKIP_FRAMES,
            window_size: DEFAULT_WINDOW_SIZE,
            verbose: false,
        }
    }

    /// Frames of the first stream to pass over before the first anchor.
    pub fn skip_frames(mut self, skip_frames: u64) -> Self {
        self.skip_frames = skip_frames;
        self
    }

    /// Number of anchors, and of candidates scanned per anchor.
    pub fn window_size(mut self, window_size: u64) -> Self {
        self.window_size = window_size;
        self
    }

    /// Emit full statistics for every scanned pair.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Runs the search and returns one result per anchor that found a candidate.
    pub fn run(
        &self,
        path_a: &Path,
        path_b: &Path,
        dispatcher: &EventDispatcher,
    ) -> CoreResult<Vec<BestMatchResult>> {
        ensure_same_size(path_a, path_b)?;

        let mut anchors = FrameReader::open(path_a, self.geometry)?;
        let skipped = anchors.skip_frames(self.skip_frames)?;
        if skipped < self.skip_frames {
            warn!(
                "{} has only {} frame(s), nothing left after skipping {}",
                path_a.display(),
                anchors.frame_count(),
                self.skip_frames
            );
        }

        let total = self
            .window_size
            .min(anchors.frame_count().saturating_sub(anchors.position()));
        dispatcher.emit(Event::StageStarted {
            stage: Stage::BestMatch,
            total,
            message: format!("Searching best matches for {total} frames"),
        });

        let mut results = Vec::new();
        for scanned in 0..self.window_size {
            let anchor_index = anchors.position();
            let Some(anchor) = anchors.next_frame()? else {
                break;
            };

            match self.scan_candidates(anchor_index, anchor, path_b, dispatcher)? {
                Some(result) => {
                    debug!(
                        "Anchor {} best matches frame {} (y mse {:.2})",
                        result.anchor_index, result.best_frame_index, result.min_y_mse
                    );
                    dispatcher.emit(Event::BestMatchFound(result));
                    results.push(result);
                }
                None => debug!("Anchor {anchor_index} found no candidate frame"),
            }

            dispatcher.emit(Event::StageProgress {
                stage: Stage::BestMatch,
                current: scanned + 1,
                total,
            });
        }

        dispatcher.emit(Event::StageComplete {
            stage: Stage::BestMatch,
        });
        Ok(results)
    }

    fn scan_candidates(
        &self,
        anchor_index: u64,
        anchor: &PlanarFrame,
        path_b: &Path,
        dispatcher: &EventDispatcher,
    ) -> CoreResult<Option<BestMatchResult>> {
        let mut candidates = FrameReader::open(path_b, self.geometry)?;
        let mut best: Option<(u64, f64)> = None;

        for _ in 0..self.window_size {
            let candidate_index = candidates.position();
            let Some(candidate) = candidates.next_frame()? else {
                break;
            };

            let y_mse = if self.verbose {
                let stats = compute_stats(anchor, Some(candidate));
                dispatcher.emit(Event::PairScanned {
                    anchor_index,
                    candidate_index,
                    stats,
                });
                stats.y_mse
            } else {
                luma_mse(anchor, candidate)
            };

            if y_mse >= 0.0 && best.is_none_or(|(_, lowest)| y_mse < lowest) {
                best = Some((candidate_index, y_mse));
            }
        }

        Ok(best.map(|(best_frame_index, min_y_mse)| BestMatchResult {
            anchor_index,
            best_frame_index,
            min_y_mse,
        }))
    }
}
