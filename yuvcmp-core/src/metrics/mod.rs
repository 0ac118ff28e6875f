// ============================================================================
// yuvcmp-core/src/metrics/mod.rs
// ============================================================================
//
// FRAME METRICS: Error, quality, sharpness and hash statistics per frame
//
// KEY COMPONENTS:
// - compute_stats: reduces one or two frames to a FrameStats value
// - plane_mse / psnr: per-plane error and its logarithmic quality score
// - sharpness: Laplacian variance of the luma plane
// - phash: 64-bit perceptual hash of the luma plane
//
// With a single frame only the sharpness and hash of that frame are filled
// in; every error field stays at zero.

pub mod phash;
pub mod sharpness;

pub use phash::{HASH_BLOCK_SIZE, HASH_SAMPLE_SIZE, hamming_distance, perceptual_hash};
pub use sharpness::laplacian_variance;

use crate::frame::{PlanarFrame, Plane, PlaneKind};

use log::warn;
use std::fmt;

/// Largest 8-bit sample value, the peak signal for PSNR.
pub const MAX_SAMPLE_VALUE: f64 = 255.0;

/// Returned by [`plane_mse`] when the two planes differ in dimensions.
pub const MSE_MISMATCH: f64 = -1.0;

/// Highest Hamming distance still assessed as "Near Identical".
pub const NEAR_IDENTICAL_DISTANCE: u32 = 10;

/// Statistics for one frame or one pair of frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub y_mse: f64,
    pub u_mse: f64,
    pub v_mse: f64,
    pub y_psnr: f64,
    pub u_psnr: f64,
    pub v_psnr: f64,
    pub sharpness: [f64; 2],
    pub hash: [u64; 2],
}

impl FrameStats {
    /// Hamming distance between the two frame hashes.
    #[must_use]
    pub fn hash_distance(&self) -> u32 {
        hamming_distance(self.hash[0], self.hash[1])
    }

    #[must_use]
    pub fn assessment(&self) -> Assessment {
        Assessment::from_distance(self.hash_distance())
    }
}

/// Verdict on how alike two frames look, bucketed by hash distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    ExactMatch,
    NearIdentical,
    Different,
}

impl Assessment {
    #[must_use]
    pub fn from_distance(distance: u32) -> Self {
        match distance {
            0 => Assessment::ExactMatch,
            d if d <= NEAR_IDENTICAL_DISTANCE => Assessment::NearIdentical,
            _ => Assessment::Different,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::ExactMatch => "Exact Match",
            Assessment::NearIdentical => "Near Identical",
            Assessment::Different => "Different",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mean squared error between two planes.
///
/// Planes of different dimensions yield [`MSE_MISMATCH`] and a warning.
#[must_use]
pub fn plane_mse(a: Plane<'_>, b: Plane<'_>) -> f64 {
    if a.dimensions() != b.dimensions() {
        warn!(
            "Plane dimensions do not match ({}x{} vs {}x{})",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        );
        return MSE_MISMATCH;
    }

    let count = a.pixel_count();
    if count == 0 {
        return 0.0;
    }

    let total: u64 = a
        .rows()
        .zip(b.rows())
        .map(|(ra, rb)| {
            ra.iter()
                .zip(rb)
                .map(|(&pa, &pb)| {
                    let diff = u64::from(pa.abs_diff(pb));
                    diff * diff
                })
                .sum::<u64>()
        })
        .sum();

    total as f64 / count as f64
}

/// Peak signal-to-noise ratio in dB for an 8-bit plane.
///
/// Identical planes (mse of zero) give `+inf`; the mismatch sentinel gives NaN.
#[must_use]
pub fn psnr(mse: f64) -> f64 {
    if mse == 0.0 {
        f64::INFINITY
    } else if mse < 0.0 {
        f64::NAN
    } else {
        10.0 * ((MAX_SAMPLE_VALUE * MAX_SAMPLE_VALUE) / mse).log10()
    }
}

/// Luma-only error between two frames.
#[must_use]
pub fn luma_mse(a: &PlanarFrame, b: &PlanarFrame) -> f64 {
    plane_mse(a.luma(), b.luma())
}

/// Computes the statistics for `a`, or for the pair `a`/`b` when `b` is given.
#[must_use]
pub fn compute_stats(a: &PlanarFrame, b: Option<&PlanarFrame>) -> FrameStats {
    let mut stats = FrameStats::default();

    if let Some(b) = b {
        let [y, u, v] = PlaneKind::ALL.map(|kind| plane_mse(a.plane(kind), b.plane(kind)));
        stats.y_mse = y;
        stats.u_mse = u;
        stats.v_mse = v;
        stats.y_psnr = psnr(y);
        stats.u_psnr = psnr(u);
        stats.v_psnr = psnr(v);
    }

    stats.sharpness[0] = laplacian_variance(a.luma());
    stats.hash[0] = perceptual_hash(a.luma());

    if let Some(b) = b {
        stats.sharpness[1] = laplacian_variance(b.luma());
        stats.hash[1] = perceptual_hash(b.luma());
    }

    stats
}
