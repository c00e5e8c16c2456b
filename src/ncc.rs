//! # Normalised cross-correlation matcher
//!
//! Scores each candidate disparity by the zero-mean normalised cross-correlation of the two
//! patches and keeps the highest. A patch with no variance correlates as 0.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::disparity::{DisparityAlgorithm, DisparityMap, Params, StereoPair};
use crate::error::*;
use crate::image::{GrayFloatImage, Patch};
use crate::matcher::{block_match, Criterion};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// NCC block matcher.
#[derive(Debug, Clone)]
pub struct Ncc {
    params: Params
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Compute the NCC disparity map of `left` against `right`.
///
/// Takes the same arguments as [`crate::ssd::disparity_ssd`].
pub fn disparity_nc(
    left: &GrayFloatImage,
    right: &GrayFloatImage,
    disp_range: (usize, usize),
    k_size: usize
) -> Result<DisparityMap> {
    let params = Params::new(disp_range, k_size);
    block_match(&Ncc::new(params), left, right, &params)
}

/// Zero-mean normalised cross-correlation between two patches of the same size, in `[-1, 1]`.
///
/// Returns 0 when either patch is flat.
pub fn score(left: &Patch, right: &Patch) -> f32 {
    let mean_l = left.mean();
    let mean_r = right.mean();

    let mut num = 0.0f32;
    let mut var_l = 0.0f32;
    let mut var_r = 0.0f32;

    for (l, r) in left.rows().zip(right.rows()) {
        for (a, b) in l.iter().zip(r) {
            let a = a - mean_l;
            let b = b - mean_r;

            num += a * b;
            var_l += a * a;
            var_r += b * b;
        }
    }

    let denom = (var_l * var_r).sqrt();

    if denom != 0.0 {
        num / denom
    }
    else {
        0.0
    }
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Ncc {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl Criterion for Ncc {
    /// A candidate has to beat perfect anti-correlation.
    const WORST: f32 = -1.0;

    fn score(&self, left: &Patch, right: &Patch) -> f32 {
        score(left, right)
    }

    fn improves(&self, score: f32, best: f32) -> bool {
        score > best
    }
}

impl DisparityAlgorithm for Ncc {
    fn compute(&self, frame: &StereoPair) -> Result<DisparityMap> {
        block_match(self, &frame.left, &frame.right, &self.params)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> GrayFloatImage {
        GrayFloatImage::from_fn(6, 6, |x, y| (x + 2 * y) as f32 / 16.0)
    }

    #[test]
    fn self_correlation_is_one() {
        let img = ramp();
        let s = score(&img.patch(1, 1, 3), &img.patch(1, 1, 3));
        assert!((s - 1.0).abs() < 1e-6, "score was {}", s);
    }

    #[test]
    fn invariant_to_gain_and_offset() {
        let img = ramp();
        let scaled = GrayFloatImage::from_fn(6, 6, |x, y| 0.5 * img.get(x, y) + 0.25);

        let s = score(&img.patch(2, 2, 3), &scaled.patch(2, 2, 3));
        assert!((s - 1.0).abs() < 1e-5, "score was {}", s);
    }

    #[test]
    fn inverted_patch_is_anti_correlated() {
        let img = ramp();
        let inverted = GrayFloatImage::from_fn(6, 6, |x, y| 1.0 - img.get(x, y));

        let s = score(&img.patch(0, 0, 4), &inverted.patch(0, 0, 4));
        assert!((s + 1.0).abs() < 1e-5, "score was {}", s);
    }

    #[test]
    fn flat_patch_scores_zero() {
        let img = ramp();
        let flat = GrayFloatImage::from_fn(6, 6, |_, _| 0.5);

        assert_eq!(score(&flat.patch(0, 0, 3), &img.patch(0, 0, 3)), 0.0);
        assert_eq!(score(&img.patch(0, 0, 3), &flat.patch(0, 0, 3)), 0.0);
        assert_eq!(score(&flat.patch(0, 0, 3), &flat.patch(2, 2, 3)), 0.0);
    }

    #[test]
    fn higher_is_better() {
        let ncc = Ncc::new(Params::new((0, 1), 3));
        assert!(ncc.improves(0.9, 0.1));
        assert!(!ncc.improves(0.5, 0.5));
        assert!(!ncc.improves(-1.0, Ncc::WORST));
        assert!(ncc.improves(0.0, Ncc::WORST));
    }
}
