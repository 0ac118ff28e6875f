// ============================================================================
// yuvcmp-core/src/metrics/phash.rs
// ============================================================================
//
// PERCEPTUAL HASH: 64-bit DCT fingerprint of a luma plane
//
// 1. Area-average the plane down to a 32x32 block of 8-bit samples.
// 2. Run an orthonormal 2-D DCT-II over the block.
// 3. Keep the 8x8 lowest-frequency coefficients.
// 4. Threshold at the mean of the two middle coefficients.
// 5. Coefficient i sets bit 63 - i when it lies above the threshold.
//
// Only the relative order of low-frequency energy survives, which keeps the
// hash stable across brightness shifts, mild rescaling and re-encoding.

use crate::frame::Plane;

use log::trace;
use std::f64::consts::PI;

/// Side of the downsampled block fed to the transform.
pub const HASH_SAMPLE_SIZE: usize = 32;

/// Side of the low-frequency coefficient block that forms the hash.
pub const HASH_BLOCK_SIZE: usize = 8;

const HASH_BITS: usize = HASH_BLOCK_SIZE * HASH_BLOCK_SIZE;

/// Number of differing bits between two hashes.
#[must_use]
pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Computes the perceptual hash of a luma plane.
#[must_use]
pub fn perceptual_hash(luma: Plane<'_>) -> u64 {
    let samples = downsample_area(luma, HASH_SAMPLE_SIZE);
    let floats: Vec<f64> = samples.iter().map(|&s| f64::from(s)).collect();
    let coefficients = dct_2d(&floats, HASH_SAMPLE_SIZE);
    let block = low_frequency_block(&coefficients, HASH_SAMPLE_SIZE);

    if log::log_enabled!(log::Level::Trace) {
        trace!("DCT 8x8 Block:");
        for row in block.chunks(HASH_BLOCK_SIZE) {
            let line: Vec<String> = row.iter().map(|v| format!("{v:7.2}")).collect();
            trace!("{}", line.join(" "));
        }
    }

    let threshold = midpoint_threshold(&block);
    let hash = hash_from_block(&block, threshold);
    trace!("median {threshold:.6}, DCT Hash: {hash:016x}");
    hash
}

/// Resamples `plane` to `size` x `size`, rounding the result to 8 bits.
///
/// When the plane is at least `size` in both directions each output sample
/// is the average of the source area under it, with partial source pixels at
/// block edges weighted by their coverage. Otherwise the plane is resampled
/// with a fixed-point bilinear filter whose taps snap to the area grid, which
/// is how area interpolation behaves when it has to enlarge.
#[must_use]
pub fn downsample_area(plane: Plane<'_>, size: usize) -> Vec<u8> {
    if plane.width() < size || plane.height() < size {
        return resample_linear(plane, size);
    }

    let x_weights = area_weights(plane.width(), size);
    let y_weights = area_weights(plane.height(), size);
    let mut out = Vec::with_capacity(size * size);

    for row_weights in &y_weights {
        for col_weights in &x_weights {
            let mut sum = 0.0;
            let mut area = 0.0;
            for &(sy, wy) in row_weights {
                let row = plane.row(sy);
                for &(sx, wx) in col_weights {
                    let w = wy * wx;
                    sum += w * f64::from(row[sx]);
                    area += w;
                }
            }
            let value = if area > 0.0 { sum / area } else { 0.0 };
            out.push(value.round_ties_even().clamp(0.0, 255.0) as u8);
        }
    }

    out
}

/// Fractional bits of the bilinear coefficients.
const LINEAR_COEF_BITS: u32 = 11;
const LINEAR_COEF_SCALE: f64 = (1 << LINEAR_COEF_BITS) as f64;

/// Two-tap filter for one destination index: source indices and weights.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LinearTap {
    first: usize,
    second: usize,
    weights: [i64; 2],
}

fn resample_linear(plane: Plane<'_>, size: usize) -> Vec<u8> {
    let x_taps = linear_taps(plane.width(), size);
    let y_taps = linear_taps(plane.height(), size);
    let shift = 2 * LINEAR_COEF_BITS;
    let mut out = Vec::with_capacity(size * size);

    for ty in &y_taps {
        let top = plane.row(ty.first);
        let bottom = plane.row(ty.second);
        for tx in &x_taps {
            let horizontal = |row: &[u8]| {
                i64::from(row[tx.first]) * tx.weights[0] + i64::from(row[tx.second]) * tx.weights[1]
            };
            let sum = horizontal(top) * ty.weights[0] + horizontal(bottom) * ty.weights[1];
            let value = (sum + (1 << (shift - 1))) >> shift;
            out.push(value.clamp(0, 255) as u8);
        }
    }

    out
}

fn linear_taps(src_len: usize, dst_len: usize) -> Vec<LinearTap> {
    let scale = src_len as f64 / dst_len as f64;
    let inv_scale = dst_len as f64 / src_len as f64;
    let last = src_len - 1;

    (0..dst_len)
        .map(|d| {
            let sx = (d as f64 * scale).floor() as usize;
            let fx = (d + 1) as f64 - (sx + 1) as f64 * inv_scale;
            let mut fx = if fx <= 0.0 { 0.0 } else { fx - fx.floor() };
            let (first, second) = if sx >= last {
                fx = 0.0;
                (last, last)
            } else {
                (sx, sx + 1)
            };
            let w1 = (fx * LINEAR_COEF_SCALE).round() as i64;
            LinearTap {
                first,
                second,
                weights: [(LINEAR_COEF_SCALE as i64) - w1, w1],
            }
        })
        .collect()
}

/// For each destination index, the source indices it covers and the length
/// of each overlap.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 1e-9).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}

/// Orthonormal 2-D DCT-II of an `n` x `n` row-major block.
#[must_use]
pub fn dct_2d(block: &[f64], n: usize) -> Vec<f64> {
    assert_eq!(block.len(), n * n, "dct_2d expects an n x n block");

    let basis = dct_basis(n);
    let transform = |input: &[f64], output: &mut [f64]| {
        for (k, out) in output.iter_mut().enumerate() {
            let row = &basis[k * n..(k + 1) * n];
            *out = row.iter().zip(input).map(|(c, x)| c * x).sum();
        }
    };

    // Rows first.
    let mut rows = vec![0.0; n * n];
    for (src, dst) in block.chunks(n).zip(rows.chunks_mut(n)) {
        transform(src, dst);
    }

    // Then columns.
    let mut out = vec![0.0; n * n];
    let mut column = vec![0.0; n];
    let mut transformed = vec![0.0; n];
    for x in 0..n {
        for y in 0..n {
            column[y] = rows[y * n + x];
        }
        transform(&column, &mut transformed);
        for y in 0..n {
            out[y * n + x] = transformed[y];
        }
    }

    out
}

/// Row k holds the scaled cosines for frequency k.
fn dct_basis(n: usize) -> Vec<f64> {
    let len = n as f64;
    let mut basis = Vec::with_capacity(n * n);
    for k in 0..n {
        let scale = if k == 0 { (1.0 / len).sqrt() } else { (2.0 / len).sqrt() };
        for i in 0..n {
            let angle = PI * (2 * i + 1) as f64 * k as f64 / (2.0 * len);
            basis.push(scale * angle.cos());
        }
    }
    basis
}

/// Top-left `HASH_BLOCK_SIZE` square of an `n` x `n` coefficient block.
fn low_frequency_block(coefficients: &[f64], n: usize) -> [f64; HASH_BITS] {
    let mut block = [0.0; HASH_BITS];
    for i in 0..HASH_BLOCK_SIZE {
        for j in 0..HASH_BLOCK_SIZE {
            block[i * HASH_BLOCK_SIZE + j] = coefficients[i * n + j];
        }
    }
    block
}

/// Mean of the values at sorted positions 31 and 32, found by selection on a
/// copy so the caller's coefficient order is untouched.
pub(crate) fn midpoint_threshold(values: &[f64; HASH_BITS]) -> f64 {
    let mut scratch = *values;
    let mid = HASH_BITS / 2;
    let (_, low, _) = scratch.select_nth_unstable_by(mid - 1, f64::total_cmp);
    let low = *low;
    let (_, high, _) = scratch.select_nth_unstable_by(mid, f64::total_cmp);
    let high = *high;
    (low + high) / 2.0
}

/// Sets bit `63 - i` for every coefficient `i` above `threshold`.
pub(crate) fn hash_from_block(values: &[f64; HASH_BITS], threshold: f64) -> u64 {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > threshold)
        .fold(0u64, |hash, (i, _)| hash | (1u64 << (HASH_BITS - 1 - i)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(width: usize, height: usize, offset: u8) -> Vec<u8> {
        // Deterministic LCG noise kept inside [20, 220) so shifts never clip.
        let mut state: u32 = 0x1234_5678;
        (0..width * height)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                20 + ((state >> 24) % 200) as u8 + offset
            })
            .collect()
    }

    #[test]
    fn test_hamming_distance_properties() {
        let a = 0xDEAD_BEEF_0000_FFFF;
        let b = 0x0123_4567_89AB_CDEF;
        assert_eq!(hamming_distance(a, a), 0);
        assert_eq!(hamming_distance(a, b), hamming_distance(b, a));
        assert_eq!(hamming_distance(0, u64::MAX), 64);
        assert_eq!(hamming_distance(0b1010, 0b0110), 2);
    }

    #[test]
    fn test_midpoint_threshold_and_bit_order() {
        let mut values = [0.0; 64];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as f64;
        }
        // Reverse to prove the selection does not depend on input order.
        values.reverse();
        let threshold = midpoint_threshold(&values);
        assert_eq!(threshold, 31.5);
        assert_eq!(values[0], 63.0);

        // Coefficients 0..32 now hold 63..32 and land in the top 32 bits.
        assert_eq!(hash_from_block(&values, threshold), 0xFFFF_FFFF_0000_0000);
    }

    #[test]
    fn test_first_coefficient_maps_to_highest_bit() {
        let mut values = [0.0; 64];
        values[0] = 100.0;
        assert_eq!(hash_from_block(&values, 0.0), 1u64 << 63);
        values[63] = 100.0;
        assert_eq!(hash_from_block(&values, 0.0), (1u64 << 63) | 1);
    }

    #[test]
    fn test_dct_of_constant_block_is_dc_only() {
        let block = vec![10.0; 32 * 32];
        let coefficients = dct_2d(&block, 32);
        assert!((coefficients[0] - 320.0).abs() < 1e-9);
        assert!(coefficients[1..].iter().all(|c| c.abs() < 1e-9));
    }

    #[test]
    fn test_dct_is_orthonormal() {
        let block: Vec<f64> = (0..64).map(|i| ((i * 37) % 11) as f64).collect();
        let coefficients = dct_2d(&block, 8);
        let energy_in: f64 = block.iter().map(|v| v * v).sum();
        let energy_out: f64 = coefficients.iter().map(|v| v * v).sum();
        assert!((energy_in - energy_out).abs() < 1e-6);
    }

    #[test]
    fn test_downsample_area_averages_blocks() {
        // 64x64 plane made of 2x2 tiles holding 0, 2, 4 and 6.
        let mut data = vec![0u8; 64 * 64];
        for y in 0..64 {
            for x in 0..64 {
                data[y * 64 + x] = (((y % 2) * 2 + (x % 2)) * 2) as u8;
            }
        }
        let plane = Plane::from_slice(&data, 64, 64).unwrap();
        let out = downsample_area(plane, 32);
        assert_eq!(out.len(), 32 * 32);
        assert!(out.iter().all(|&v| v == 3));
    }

    #[test]
    fn test_downsample_identity_at_target_size() {
        let data = textured(32, 32, 0);
        let plane = Plane::from_slice(&data, 32, 32).unwrap();
        assert_eq!(downsample_area(plane, 32), data);
    }

    #[test]
    fn test_downsample_fractional_coverage() {
        // 48 columns onto 32: each output spans 1.5 source pixels.
        let data: Vec<u8> = (0..48 * 32).map(|i| if i % 48 < 24 { 0 } else { 200 }).collect();
        let plane = Plane::from_slice(&data, 48, 32).unwrap();
        let out = downsample_area(plane, 32);
        assert_eq!(out[0], 0);
        assert_eq!(out[31], 200);
        // Output 16 covers source columns 24..25.5, all bright.
        assert_eq!(out[16], 200);
    }

    #[test]
    fn test_integer_enlargement_replicates_samples() {
        let data: Vec<u8> = (0..16 * 32).map(|i| ((i % 16) * 10) as u8).collect();
        let plane = Plane::from_slice(&data, 16, 32).unwrap();
        let out = downsample_area(plane, 32);

        let first_row = &out[..32];
        assert_eq!(&first_row[..4], &[0, 0, 10, 10]);
        assert_eq!(&first_row[30..], &[150, 150]);
        assert!(out.chunks(32).all(|row| row == first_row));
    }

    #[test]
    fn test_short_wide_plane_uses_two_tap_filter() {
        // 128 columns onto 32 while 16 rows grow to 32: the enlarging axis
        // sends both axes through the two-tap filter, so each output blends
        // source columns 4d and 4d+1 at 1:3 instead of averaging all four.
        let data: Vec<u8> = (0..128 * 16).map(|i| ((i % 128) * 2) as u8).collect();
        let plane = Plane::from_slice(&data, 128, 16).unwrap();
        let out = downsample_area(plane, 32);

        for (d, &value) in out[..32].iter().enumerate() {
            assert_eq!(value, (8 * d + 2) as u8);
        }
    }

    #[test]
    fn test_tiny_flat_plane_stays_flat() {
        let data = vec![77u8; 4 * 4];
        let plane = Plane::from_slice(&data, 4, 4).unwrap();
        assert!(downsample_area(plane, 32).iter().all(|&v| v == 77));
    }

    #[test]
    fn test_hash_is_deterministic_and_brightness_stable() {
        let base = textured(64, 48, 0);
        let brighter = textured(64, 48, 10);
        let plane = Plane::from_slice(&base, 64, 48).unwrap();
        let shifted = Plane::from_slice(&brighter, 64, 48).unwrap();

        let hash = perceptual_hash(plane);
        assert_eq!(hash, perceptual_hash(plane));
        assert!(hamming_distance(hash, perceptual_hash(shifted)) <= 2);
    }

    #[test]
    fn test_different_content_produces_distant_hashes() {
        let noise = textured(64, 64, 0);
        let gradient: Vec<u8> = (0..64 * 64).map(|i| ((i % 64) * 4) as u8).collect();
        let a = perceptual_hash(Plane::from_slice(&noise, 64, 64).unwrap());
        let b = perceptual_hash(Plane::from_slice(&gradient, 64, 64).unwrap());
        assert!(hamming_distance(a, b) > 10);
    }
}
