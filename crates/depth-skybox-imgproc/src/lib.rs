//! Image-processing building blocks for depth skybox generation.
//!
//! Everything here works on [`depth_skybox_core::Grid`] images and is
//! independent of file formats:
//! - rotation-only homographies and the facing test,
//! - z-depth to radial depth conversion,
//! - nearest-neighbour perspective warps and bilinear coverage masks,
//! - 3x3 erosion, nearest and bilinear resizing, horizontal concatenation.

mod concat;
mod error;
mod homography;
mod linearize;
mod morphology;
mod resize;
mod warp;

pub use concat::*;
pub use error::*;
pub use homography::*;
pub use linearize::*;
pub use morphology::*;
pub use resize::*;
pub use warp::*;
