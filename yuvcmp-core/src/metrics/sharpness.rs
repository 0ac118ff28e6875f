//! Laplacian-variance sharpness estimate.
//!
//! The plane is filtered with the 4-neighbour Laplacian kernel
//! `[0 1 0; 1 -4 1; 0 1 0]`, mirroring edges without repeating the border
//! sample (reflect-101). The population variance of the filter response is
//! the score: more edge energy gives a higher value.

use crate::frame::Plane;

/// Variance of the Laplacian response over the whole plane.
#[must_use]
pub fn laplacian_variance(plane: Plane<'_>) -> f64 {
    let (width, height) = plane.dimensions();
    let count = plane.pixel_count();
    if count == 0 {
        return 0.0;
    }

    let mut sum = 0.0;
    let mut sum_sq = 0.0;

    for y in 0..height {
        let up = plane.row(reflect_101(y as isize - 1, height));
        let row = plane.row(y);
        let down = plane.row(reflect_101(y as isize + 1, height));

        for x in 0..width {
            let left = row[reflect_101(x as isize - 1, width)];
            let right = row[reflect_101(x as isize + 1, width)];
            let response = f64::from(up[x]) + f64::from(down[x]) + f64::from(left)
                + f64::from(right)
                - 4.0 * f64::from(row[x]);
            sum += response;
            sum_sq += response * response;
        }
    }

    let n = count as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Mirrors an out-of-range index back into `0..len` (`-1 -> 1`, `len -> len - 2`).
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mirrored = if index < 0 {
        -index
    } else if index > last {
        2 * last - index
    } else {
        index
    };
    mirrored.clamp(0, last) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(2, 4), 2);
        assert_eq!(reflect_101(-1, 1), 0);
        assert_eq!(reflect_101(1, 1), 0);
        assert_eq!(reflect_101(2, 2), 0);
    }

    #[test]
    fn test_flat_plane_has_zero_sharpness() {
        let data = vec![128u8; 16 * 8];
        let plane = Plane::from_slice(&data, 16, 8).unwrap();
        assert_eq!(laplacian_variance(plane), 0.0);
    }

    #[test]
    fn test_linear_ramp_responds_only_at_borders() {
        // The Laplacian of a ramp vanishes inside; reflect-101 folds the
        // ramp back at the end columns, which is the only response.
        let data: Vec<u8> = (0..8 * 8).map(|i| (i % 8) as u8 * 10).collect();
        let plane = Plane::from_slice(&data, 8, 8).unwrap();
        let score = laplacian_variance(plane);
        assert!(score > 0.0);
    }

    #[test]
    fn test_hard_edge_is_sharper_than_soft_edge() {
        let hard: Vec<u8> = (0..16 * 16).map(|i| if i % 16 < 8 { 0 } else { 200 }).collect();
        let soft: Vec<u8> = (0..16 * 16)
            .map(|i| match i % 16 {
                0..=5 => 0,
                6 => 50,
                7 => 100,
                8 => 150,
                _ => 200,
            })
            .collect();

        let hard_score = laplacian_variance(Plane::from_slice(&hard, 16, 16).unwrap());
        let soft_score = laplacian_variance(Plane::from_slice(&soft, 16, 16).unwrap());
        assert!(hard_score > soft_score);
    }

    #[test]
    fn test_single_impulse_variance() {
        // One bright sample in the middle of a 5x5 black plane: responses are
        // -400 at the centre and +100 at its four neighbours.
        let mut data = vec![0u8; 25];
        data[12] = 100;
        let score = laplacian_variance(Plane::from_slice(&data, 5, 5).unwrap());
        let expected = (400.0f64 * 400.0 + 4.0 * 100.0 * 100.0) / 25.0;
        assert!((score - expected).abs() < 1e-9);
    }
}
