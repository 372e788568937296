//! Guided hole filling for depth images.
//!
//! Depth is quantized to 8 bits, holes are filled with a multi-scale cross
//! bilateral filter steered by a grayscale image of the same view, and the
//! result is mapped back to the original depth range. See [`HoleFiller`].

mod cbf;
mod error;
mod gray;
mod hole_filler;
mod params;

pub use cbf::*;
pub use error::*;
pub use gray::*;
pub use hole_filler::*;
pub use params::*;
