//! # Sum of squared differences matcher
//!
//! Scores each candidate disparity by the sum of squared intensity differences between the two
//! patches and keeps the lowest.

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

/// SSD block matcher.
#[derive(Debug, Clone)]
pub struct Ssd {
    params: Params
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Compute the SSD disparity map of `left` against `right`.
///
/// `disp_range` is the inclusive (min, max) disparity searched and `k_size` the patch size,
/// giving a `2 * (k_size / 2) + 1` square window.
pub fn disparity_ssd(
    left: &GrayFloatImage,
    right: &GrayFloatImage,
    disp_range: (usize, usize),
    k_size: usize
) -> Result<DisparityMap> {
    let params = Params::new(disp_range, k_size);
    block_match(&Ssd::new(params), left, right, &params)
}

/// Sum of squared differences between two patches of the same size.
pub fn score(left: &Patch, right: &Patch) -> f32 {
    left.rows()
        .zip(right.rows())
        .map(|(l, r)| {
            l.iter()
                .zip(r)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f32>()
        })
        .sum()
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Ssd {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl Criterion for Ssd {
    const WORST: f32 = f32::INFINITY;

    fn score(&self, left: &Patch, right: &Patch) -> f32 {
        score(left, right)
    }

    fn improves(&self, score: f32, best: f32) -> bool {
        score < best
    }
}

impl DisparityAlgorithm for Ssd {
    fn compute(&self, frame: &StereoPair) -> Result<DisparityMap> {
        block_match(self, &frame.left, &frame.right, &self.params)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
