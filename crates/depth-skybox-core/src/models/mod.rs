//! Camera models used by the rig.
//!
//! Every source camera is an undistorted pinhole ([`PinholeIntrinsics`])
//! placed in the world by a rigid pose ([`CameraExtrinsics`]).

mod extrinsics;
mod intrinsics;

pub use extrinsics::*;
pub use intrinsics::*;
