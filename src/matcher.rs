//! # Block matching scan
//!
//! The search loop shared by all matchers. For every interior pixel of the left image each
//! candidate disparity is scored by comparing the patch around the pixel with the right image
//! patch shifted left by that disparity. The matcher's [`Criterion`] decides what "better"
//! means.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use log::{debug, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::disparity::{check_shape, DisparityMap, Params};
use crate::error::*;
use crate::image::{GrayFloatImage, Patch};

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// A patch similarity criterion.
pub trait Criterion {
    /// Score every candidate must strictly improve on to be selected.
    const WORST: f32;

    /// Score the left patch against a candidate right patch.
    fn score(&self, left: &Patch, right: &Patch) -> f32;

    /// Returns true if `score` is strictly better than `best`.
    ///
    /// Must be strict: on equal scores the first (smallest) disparity is kept.
    fn improves(&self, score: f32, best: f32) -> bool;
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Disparity extremes and resolved pixel count for a set of rows.
#[derive(Debug, Clone, Copy, Default)]
struct ScanStats {
    min: Option<usize>,
    max: Option<usize>,
    resolved: usize
}

impl ScanStats {
    fn record(&mut self, d: usize) {
        self.min = Some(self.min.map_or(d, |m| m.min(d)));
        self.max = Some(self.max.map_or(d, |m| m.max(d)));
        self.resolved += 1;
    }

    fn merge(self, other: Self) -> Self {
        Self {
            min: merge_with(self.min, other.min, std::cmp::min),
            max: merge_with(self.max, other.max, std::cmp::max),
            resolved: self.resolved + other.resolved
        }
    }
}

fn merge_with(a: Option<usize>, b: Option<usize>, f: fn(usize, usize) -> usize) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, b) => a.or(b)
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Run the block matching search over the whole pair.
///
/// Parameters and image shapes are validated before anything is computed. Pixels closer than
/// `k / 2` to any edge, and pixels for which no candidate improves on [`Criterion::WORST`],
/// keep disparity 0. A patch larger than the image is not an error, the map is all zeros.
pub fn block_match<C>(
    criterion: &C,
    left: &GrayFloatImage,
    right: &GrayFloatImage,
    params: &Params
) -> Result<DisparityMap>
where
    C: Criterion + Sync
{
    params.validate()?;
    check_shape(left, right)?;

    let (width, height) = left.shape();
    let half = params.half_size();

    debug!(
        "Block matching {}x{} pair, disparity {}..={}, window {}",
        width, height, params.min_disparity, params.max_disparity, params.window_size()
    );

    let mut disp_map = DisparityMap::new(width, height);

    if width <= 2 * half || height <= 2 * half {
        warn!(
            "Window {} does not fit in a {}x{} image, disparity map is empty",
            params.window_size(), width, height
        );
        return Ok(disp_map);
    }

    let rows = half..(height - half);

    #[cfg(feature = "rayon")]
    let stats = disp_map
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(y, _)| rows.contains(y))
        .map(|(y, out)| match_row(criterion, left, right, params, y, out))
        .reduce(ScanStats::default, ScanStats::merge);

    #[cfg(not(feature = "rayon"))]
    let stats = disp_map
        .as_mut_slice()
        .chunks_mut(width)
        .enumerate()
        .filter(|(y, _)| rows.contains(y))
        .map(|(y, out)| match_row(criterion, left, right, params, y, out))
        .fold(ScanStats::default(), ScanStats::merge);

    disp_map.min_disp = stats.min.map(|d| d as f32);
    disp_map.max_disp = stats.max.map(|d| d as f32);

    debug!(
        "Resolved {} of {} pixels, disparity range {:?}..={:?}",
        stats.resolved, width * height, stats.min, stats.max
    );

    Ok(disp_map)
}

/// Match every interior pixel of row `y`, writing winners into `out`.
fn match_row<C: Criterion>(
    criterion: &C,
    left: &GrayFloatImage,
    right: &GrayFloatImage,
    params: &Params,
    y: usize,
    out: &mut [f32]
) -> ScanStats {
    let half = params.half_size();
    let size = params.window_size();
    let top = y - half;
    let mut stats = ScanStats::default();

    for x in half..(left.width() - half) {
        let patch_l = left.patch(x - half, top, size);

        let mut best_score = C::WORST;
        let mut best_disp = None;

        // A candidate is skipped when the shifted patch would start left of column 0, and
        // that only gets worse as d grows, so the range is cut at x - half.
        let max_disp = params.max_disparity.min(x - half);

        for d in params.min_disparity..=max_disp {
            let patch_r = right.patch(x - half - d, top, size);
            let score = criterion.score(&patch_l, &patch_r);

            if criterion.improves(score, best_score) {
                best_score = score;
                best_disp = Some(d);
            }
        }

        if let Some(d) = best_disp {
            out[x] = d as f32;
            stats.record(d);
        }
    }

    stats
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
