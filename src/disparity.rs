//! # General disparity objects
//!
//! This module provides generic disparity traits and structures for use by different algorithms.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::fs::File;
use std::path::Path;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::*;
use crate::image::GrayFloatImage;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A rectified stereo pair.
#[derive(Debug, Clone)]
pub struct StereoPair {
    pub left: GrayFloatImage,
    pub right: GrayFloatImage
}

/// A generic floating point disparity map.
///
/// `min_disp` and `max_disp` are the extremes over pixels for which a disparity was actually
/// found. Border pixels and pixels with no valid candidate hold 0 and are not counted.
#[derive(Debug, Clone)]
pub struct DisparityMap {
    data: GrayFloatImage,
    pub max_disp: Option<f32>,
    pub min_disp: Option<f32>
}

/// Block matching parameters shared by all matchers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// Smallest disparity searched, inclusive.
    pub min_disparity: usize,

    /// Largest disparity searched, inclusive.
    pub max_disparity: usize,

    /// Patch size `k`, the window is `2 * (k / 2) + 1` pixels square.
    pub patch_size: usize
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait DisparityAlgorithm {
    /// Compute the disparity map of the given stereo pair.
    fn compute(&self, frame: &StereoPair) -> Result<DisparityMap>;
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

pub(crate) fn check_shape(left: &GrayFloatImage, right: &GrayFloatImage) -> Result<()> {
    if left.shape() != right.shape() {
        return Err(Error::ShapeMismatch {
            left: left.shape(),
            right: right.shape()
        });
    }

    Ok(())
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl StereoPair {
    /// Build a pair, rejecting images of different shapes.
    pub fn new(left: GrayFloatImage, right: GrayFloatImage) -> Result<Self> {
        let pair = Self { left, right };
        pair.check_shape()?;
        Ok(pair)
    }

    /// Load both images from disk, see [`GrayFloatImage::open`].
    pub fn open<P: AsRef<Path>>(left: P, right: P) -> Result<Self> {
        Self::new(GrayFloatImage::open(left)?, GrayFloatImage::open(right)?)
    }

    pub fn width(&self) -> usize {
        self.left.width()
    }

    pub fn height(&self) -> usize {
        self.left.height()
    }

    /// Check that both images have the same shape.
    pub fn check_shape(&self) -> Result<()> {
        check_shape(&self.left, &self.right)
    }
}

impl Params {
    pub fn new(disp_range: (usize, usize), patch_size: usize) -> Self {
        Self {
            min_disparity: disp_range.0,
            max_disparity: disp_range.1,
            patch_size
        }
    }

    /// Load parameters from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let params: Params = serde_json::from_reader(file)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_disparity > self.max_disparity {
            return Err(Error::InvalidDisparityRange {
                min: self.min_disparity,
                max: self.max_disparity
            });
        }

        if self.patch_size == 0 {
            return Err(Error::InvalidPatchSize(self.patch_size));
        }

        Ok(())
    }

    /// Distance from the patch centre to its edge, `k / 2`.
    pub fn half_size(&self) -> usize {
        self.patch_size / 2
    }

    /// Side length of the matching window.
    pub fn window_size(&self) -> usize {
        2 * self.half_size() + 1
    }
}

impl DisparityMap {
    pub fn new(width: usize, height: usize) -> Self {
        DisparityMap {
            data: GrayFloatImage::new(width, height),
            min_disp: None,
            max_disp: None
        }
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data.get(x, y)
    }

    pub fn put(&mut self, x: usize, y: usize, val: f32) {
        self.data.put(x, y, val)
    }

    /// Borrow the underlying image.
    pub fn as_image(&self) -> &GrayFloatImage {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        self.data.as_mut_slice()
    }

    /// Converts the image into a dynamic Luma8 image.
    pub fn to_luma(&self) -> GrayImage {
        self.to_luma_scaled(1.0)
    }

    /// Converts the image to a normalised GrayImage.
    ///
    /// Normalises by the maximum observed disparity in the map. If the maximum disparity is not
    /// set, or is zero, then the function is equivalent to `.to_luma()`.
    pub fn to_luma_normalised(&self) -> GrayImage {
        let mult = match self.max_disp {
            Some(d) if d > 0.0 => 255.0 / d,
            _ => 1.0
        };

        self.to_luma_scaled(mult)
    }

    fn to_luma_scaled(&self, mult: f32) -> GrayImage {
        let mut new = GrayImage::new(
            self.data.width() as u32,
            self.data.height() as u32
        );

        for (x, y, px) in new.enumerate_pixels_mut() {
            let val = (self.data.get(x as usize, y as usize) * mult).max(0.0).min(255.0);
            *px = image::Luma([val as u8]);
        }

        new
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_window_size() {
        assert_eq!(Params::new((0, 5), 5).window_size(), 5);
        assert_eq!(Params::new((0, 5), 4).window_size(), 5);
        assert_eq!(Params::new((0, 5), 1).window_size(), 1);
    }

    #[test]
    fn params_validation() {
        assert!(Params::new((0, 0), 1).validate().is_ok());
        assert!(matches!(
            Params::new((4, 2), 3).validate(),
            Err(Error::InvalidDisparityRange { min: 4, max: 2 })
        ));
        assert!(matches!(
            Params::new((0, 2), 0).validate(),
            Err(Error::InvalidPatchSize(0))
        ));
    }

    #[test]
    fn params_from_json() {
        let params: Params = serde_json::from_str(
            r#"{ "min_disparity": 0, "max_disparity": 150, "patch_size": 5 }"#
        ).unwrap();

        assert_eq!(params, Params::new((0, 150), 5));
    }

    #[test]
    fn params_from_json_file_validates() {
        let path = std::env::temp_dir().join("cv_block_disparity_bad_params.json");
        std::fs::write(&path, r#"{ "min_disparity": 9, "max_disparity": 3, "patch_size": 5 }"#)
            .unwrap();

        let res = Params::from_json_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(res, Err(Error::InvalidDisparityRange { .. })));
    }

    #[test]
    fn params_from_json_file() {
        let path = std::env::temp_dir().join("cv_block_disparity_params.json");
        std::fs::write(&path, r#"{ "min_disparity": 0, "max_disparity": 5, "patch_size": 5 }"#)
            .unwrap();

        let res = Params::from_json_file(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(res.unwrap(), Params::new((0, 5), 5));
    }

    #[test]
    fn stereo_pair_open_missing_file() {
        let res = StereoPair::open("does/not/exist-L.png", "does/not/exist-R.png");
        assert!(matches!(res, Err(Error::Image(_))));
    }

    #[test]
    fn stereo_pair_rejects_mismatched_shapes() {
        let res = StereoPair::new(GrayFloatImage::new(4, 3), GrayFloatImage::new(3, 4));

        match res {
            Err(Error::ShapeMismatch { left, right }) => {
                assert_eq!(left, (4, 3));
                assert_eq!(right, (3, 4));
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ()))
        }
    }

    #[test]
    fn luma_normalised_scales_by_max() {
        let mut map = DisparityMap::new(2, 1);
        map.put(0, 0, 2.0);
        map.put(1, 0, 4.0);
        map.max_disp = Some(4.0);

        let luma = map.to_luma_normalised();
        assert_eq!(luma.get_pixel(0, 0)[0], 127);
        assert_eq!(luma.get_pixel(1, 0)[0], 255);

        assert_eq!(map.to_luma().get_pixel(1, 0)[0], 4);
    }
}
