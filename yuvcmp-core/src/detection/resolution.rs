// ============================================================================
// yuvcmp-core/src/detection/resolution.rs
// ============================================================================
//
// RESOLUTION DETECTION: Infer frame dimensions from stream length
//
// Raw I420 carries no header, so the only evidence of resolution is the file
// size. A table entry qualifies when the size is an exact multiple of its
// frame size. The result is accepted only when exactly one entry qualifies;
// anything else is ambiguous and the operator has to supply dimensions.

use crate::error::CoreResult;
use crate::frame::{FrameGeometry, stream_size};

use log::info;
use serde::Serialize;
use std::path::Path;

/// A well-known raw frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolutionCandidate {
    pub width: usize,
    pub height: usize,
    pub frame_size: usize,
    pub label: &'static str,
}

impl ResolutionCandidate {
    const fn new(width: usize, height: usize, label: &'static str) -> Self {
        Self {
            width,
            height,
            frame_size: (width * height * 3) / 2,
            label,
        }
    }

    /// Geometry for this entry. Every table entry has even, nonzero sides.
    pub fn geometry(&self) -> CoreResult<FrameGeometry> {
        FrameGeometry::new(self.width, self.height)
    }
}

/// Resolutions considered during detection, smallest first.
pub const RESOLUTION_CANDIDATES: &[ResolutionCandidate] = &[
    ResolutionCandidate::new(720, 480, "720x480p"),
    ResolutionCandidate::new(720, 576, "720x576p"),
    ResolutionCandidate::new(1280, 720, "1280x720p"),
    ResolutionCandidate::new(1920, 1080, "1920x1080p"),
    ResolutionCandidate::new(3840, 2160, "3840x2160p"),
];

/// Every candidate whose frame size divides `file_size` exactly.
pub fn qualifying_candidates(file_size: u64) -> impl Iterator<Item = &'static ResolutionCandidate> {
    RESOLUTION_CANDIDATES
        .iter()
        .filter(move |candidate| file_size % candidate.frame_size as u64 == 0)
}

/// Returns the single candidate matching `file_size`, or `None` when zero or
/// several candidates qualify.
#[must_use]
pub fn detect_resolution(file_size: u64) -> Option<&'static ResolutionCandidate> {
    let mut matches = qualifying_candidates(file_size);
    let first = matches.next()?;
    match matches.next() {
        None => Some(first),
        Some(_) => None,
    }
}

/// Runs [`detect_resolution`] on the size of `path`, logging every candidate.
pub fn detect_stream_resolution(path: &Path) -> CoreResult<Option<&'static ResolutionCandidate>> {
    let file_size = stream_size(path)?;

    for candidate in qualifying_candidates(file_size) {
        info!(
            "Detected possible {:>10}, with exactly {:6} frames in {}",
            candidate.label,
            file_size / candidate.frame_size as u64,
            path.display()
        );
    }

    let detected = detect_resolution(file_size);
    if detected.is_none() {
        info!("Resolution of {} is ambiguous or unknown", path.display());
    }
    Ok(detected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_label(label: &str) -> &'static ResolutionCandidate {
        RESOLUTION_CANDIDATES
            .iter()
            .find(|c| c.label == label)
            .unwrap()
    }

    #[test]
    fn test_table_frame_sizes() {
        assert_eq!(by_label("720x480p").frame_size, 518_400);
        assert_eq!(by_label("1920x1080p").frame_size, 3_110_400);
        assert_eq!(by_label("3840x2160p").frame_size, 12_441_600);
    }

    #[test]
    fn test_unique_match_is_detected() {
        let hd720 = by_label("1280x720p");
        assert_eq!(detect_resolution(hd720.frame_size as u64), Some(hd720));
        assert_eq!(detect_resolution(2 * hd720.frame_size as u64), Some(hd720));

        let sd = by_label("720x480p");
        assert_eq!(detect_resolution(sd.frame_size as u64), Some(sd));
    }

    #[test]
    fn test_multiple_matches_are_ambiguous() {
        // 1920x1080 is an exact multiple of both SD frame sizes.
        let fhd = by_label("1920x1080p").frame_size as u64;
        assert!(qualifying_candidates(fhd).count() > 1);
        assert_eq!(detect_resolution(fhd), None);

        // Three 720p frames are also eight 480p frames.
        let hd720 = by_label("1280x720p").frame_size as u64;
        assert_eq!(detect_resolution(3 * hd720), None);
    }

    #[test]
    fn test_no_match_and_empty_file() {
        assert_eq!(detect_resolution(1000), None);
        assert_eq!(qualifying_candidates(1000).count(), 0);
        // An empty file divides evenly by every entry.
        assert_eq!(qualifying_candidates(0).count(), RESOLUTION_CANDIDATES.len());
        assert_eq!(detect_resolution(0), None);
    }

    #[test]
    fn test_candidate_geometry_matches_frame_size() {
        for candidate in RESOLUTION_CANDIDATES {
            assert_eq!(candidate.geometry().unwrap().frame_size(), candidate.frame_size);
        }
    }
}
