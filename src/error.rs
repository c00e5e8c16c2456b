//! # Error standards
//! 
//! This module provides a standardised error enum and result type for this crate.

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Standard result type used in the disparity crate.
pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Left and right images do not have the same (width, height).
    #[error("Stereo pair shape mismatch: left is {left:?}, right is {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize)
    },

    #[error("Invalid disparity range: min ({min}) is greater than max ({max})")]
    InvalidDisparityRange {
        min: usize,
        max: usize
    },

    #[error("Invalid patch size {0}, must be at least 1")]
    InvalidPatchSize(usize),

    #[error("Image buffer has {actual} samples, expected {expected}")]
    BufferSize {
        expected: usize,
        actual: usize
    },

    #[error("Could not load image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not parse parameters: {0}")]
    Config(#[from] serde_json::Error)
}
