//! Stream format detection module
//!
//! Raw planar streams carry no metadata, so anything known about a stream
//! beyond its bytes has to be inferred here.

pub mod resolution;

pub use resolution::{
    RESOLUTION_CANDIDATES, ResolutionCandidate, detect_resolution, detect_stream_resolution,
    qualifying_candidates,
};
