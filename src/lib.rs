//! # Block Matching Disparity
//!
//! This crate provides dense disparity map computation for rectified stereo pairs using local
//! block matching, with sum of squared differences ([`ssd`]) and normalised cross-correlation
//! ([`ncc`]) criteria.
//!
//! ```no_run
//! use cv_block_disparity::prelude::*;
//!
//! # fn main() -> Result<(), cv_block_disparity::Error> {
//! let frame = StereoPair::open("pair0-L.png", "pair0-R.png")?;
//! let disp_map = Ncc::new(Params::new((0, 5), 5)).compute(&frame)?;
//! disp_map.to_luma_normalised().save("disparity.png").ok();
//! # Ok(())
//! # }
//! ```

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

mod disparity;
mod error;
mod image;
pub mod matcher;
pub mod ncc;
pub mod ssd;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::disparity::{DisparityAlgorithm, DisparityMap, Params, StereoPair};
    pub use crate::image::{GrayFloatImage, Patch};
    pub use crate::ncc::{disparity_nc, Ncc};
    pub use crate::ssd::{disparity_ssd, Ssd};
}
