// ============================================================================
// yuvcmp-core/src/processing/hash_alignment.rs
// ============================================================================
//
// HASH ALIGNMENT: Longest tolerant run of matching perceptual hashes
//
// KEY COMPONENTS:
// - HashSequence: per-stream hashes over the analysis window
// - find_longest_match: diagonal scan for the longest matching run
// - TrimInstruction: leading frames to cut so both streams start in step
//
// Two hashes match when they differ in at most MATCH_TOLERANCE bits, which
// absorbs small encoder and scaler noise between otherwise equal frames.

use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher, Stage};
use crate::frame::{FrameGeometry, FrameReader};
use crate::metrics::{compute_stats, hamming_distance};

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Highest Hamming distance at which two hashes still match.
pub const MATCH_TOLERANCE: u32 = 2;

/// Perceptual hashes of consecutive frames of one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct HashSequence {
    pub source: PathBuf,
    /// Absolute index of the frame behind `hashes[0]`
    pub first_frame: u64,
    pub hashes: Vec<u64>,
}

impl HashSequence {
    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// Longest matching run between two hash sequences.
///
/// Offsets are relative to the start of each sequence; `first_frame_*` turn
/// them back into absolute frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentResult {
    /// Length of the run; zero when nothing matched
    pub match_length: usize,
    pub offset_a: usize,
    pub offset_b: usize,
    pub first_frame_a: u64,
    pub first_frame_b: u64,
}

impl AlignmentResult {
    #[must_use]
    pub fn found(&self) -> bool {
        self.match_length > 0
    }

    /// Absolute frame indices where the matching run begins in each stream.
    #[must_use]
    pub fn absolute_starts(&self) -> [u64; 2] {
        [
            self.first_frame_a + self.offset_a as u64,
            self.first_frame_b + self.offset_b as u64,
        ]
    }

    /// Whether both streams already start with the matching run.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.found() && self.absolute_starts() == [0, 0]
    }
}

/// Leading frames to drop from one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimInstruction {
    pub source: PathBuf,
    pub frames_to_trim: u64,
    pub frame_size: usize,
}

impl TrimInstruction {
    #[must_use]
    pub fn byte_offset(&self) -> u64 {
        self.frames_to_trim * self.frame_size as u64
    }

    /// A `dd` invocation that writes the trimmed stream next to the source.
    #[must_use]
    pub fn dd_command(&self) -> String {
        let source = self.source.display();
        format!(
            "dd if={source} of={source}.trimmed bs={} skip={}",
            self.frame_size, self.frames_to_trim
        )
    }

    /// Trim instructions for every stream whose matching run starts late.
    pub fn for_alignment(
        result: &AlignmentResult,
        sources: [&Path; 2],
        geometry: FrameGeometry,
    ) -> Vec<TrimInstruction> {
        if !result.found() {
            return Vec::new();
        }
        sources
            .into_iter()
            .zip(result.absolute_starts())
            .filter(|(_, start)| *start > 0)
            .map(|(source, frames_to_trim)| TrimInstruction {
                source: source.to_path_buf(),
                frames_to_trim,
                frame_size: geometry.frame_size(),
            })
            .collect()
    }
}

/// Hashes up to `window_size` frames of `path` after skipping `skip_frames`.
///
/// Emits [`Event::FrameHashed`] for every frame.
pub fn build_hash_sequence(
    path: &Path,
    geometry: FrameGeometry,
    skip_frames: u64,
    window_size: u64,
    dispatcher: &EventDispatcher,
) -> CoreResult<HashSequence> {
    let mut reader = FrameReader::open(path, geometry)?;
    let first_frame = reader.skip_frames(skip_frames)?;
    let total = window_size.min(reader.frame_count() - first_frame);

    dispatcher.emit(Event::StageStarted {
        stage: Stage::Hashing,
        total,
        message: format!("Hashing {}", path.display()),
    });

    let mut hashes = Vec::with_capacity(total as usize);
    while (hashes.len() as u64) < window_size {
        let index = reader.position();
        let Some(frame) = reader.next_frame()? else {
            break;
        };

        let stats = compute_stats(frame, None);
        hashes.push(stats.hash[0]);
        dispatcher.emit(Event::FrameHashed {
            source: path.to_path_buf(),
            index,
            hash: stats.hash[0],
            sharpness: stats.sharpness[0],
        });
        dispatcher.emit(Event::StageProgress {
            stage: Stage::Hashing,
            current: hashes.len() as u64,
            total,
        });
    }

    dispatcher.emit(Event::StageComplete {
        stage: Stage::Hashing,
    });
    debug!(
        "{}: hashed {} frame(s) from frame {}",
        path.display(),
        hashes.len(),
        first_frame
    );

    Ok(HashSequence {
        source: path.to_path_buf(),
        first_frame,
        hashes,
    })
}

/// Finds the longest run of matching hashes between two equally long slices.
///
/// Every diagonal offset is walked in order from `-(n-1)` to `n-1`; a
/// mismatch resets the run. The first run of maximal length wins.
pub fn find_longest_match(a: &[u64], b: &[u64]) -> CoreResult<AlignmentResult> {
    if a.len() != b.len() {
        return Err(CoreError::SequenceLengthMismatch {
            len_a: a.len(),
            len_b: b.len(),
        });
    }

    let n = a.len() as isize;
    let mut best = AlignmentResult::default();

    for offset in (1 - n)..n {
        let mut run = 0usize;
        for i in 0..n {
            let j = i + offset;
            if j < 0 || j >= n {
                continue;
            }
            if hamming_distance(a[i as usize], b[j as usize]) <= MATCH_TOLERANCE {
                run += 1;
                if run > best.match_length {
                    best.match_length = run;
                    best.offset_a = i as usize + 1 - run;
                    best.offset_b = j as usize + 1 - run;
                }
            } else {
                run = 0;
            }
        }
    }

    Ok(best)
}

/// Aligns two hash sequences, carrying their absolute start frames.
pub fn align_sequences(a: &HashSequence, b: &HashSequence) -> CoreResult<AlignmentResult> {
    let mut result = find_longest_match(&a.hashes, &b.hashes)?;
    result.first_frame_a = a.first_frame;
    result.first_frame_b = b.first_frame;
    Ok(result)
}

/// Hashes both streams over the same window and reports their alignment.
pub fn align_streams(
    path_a: &Path,
    path_b: &Path,
    geometry: FrameGeometry,
    skip_frames: u64,
    window_size: u64,
    dispatcher: &EventDispatcher,
) -> CoreResult<AlignmentResult> {
    let seq_a = build_hash_sequence(path_a, geometry, skip_frames, window_size, dispatcher)?;
    let seq_b = build_hash_sequence(path_b, geometry, skip_frames, window_size, dispatcher)?;

    let result = align_sequences(&seq_a, &seq_b)?;
    let matched_hashes = seq_a
        .hashes
        .iter()
        .skip(result.offset_a)
        .take(result.match_length)
        .copied()
        .collect();
    let trims = TrimInstruction::for_alignment(&result, [path_a, path_b], geometry);

    if result.found() {
        let [start_a, start_b] = result.absolute_starts();
        info!(
            "Longest match of {} frame(s) begins at frame {} and frame {}",
            result.match_length, start_a, start_b
        );
    } else {
        warn!("No matching hash sequence between the two streams");
    }

    dispatcher.emit(Event::AlignmentComplete {
        result,
        matched_hashes,
        trims,
    });
    Ok(result)
}
