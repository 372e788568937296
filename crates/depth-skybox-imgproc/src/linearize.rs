//! Z-depth to radial depth conversion.

use depth_skybox_core::{DepthImage, EuclideanDepthImage, INVALID_DEPTH, PinholeIntrinsics, Real};
use log::debug;

/// Rays closer than this to perpendicular with the optical axis are
/// considered degenerate.
pub const MIN_COS_ANGLE: Real = 1e-6;

/// Convert depth measured along the optical axis to distance from the
/// optical centre.
///
/// Each pixel is divided by the cosine between its viewing ray and the
/// optical axis. Invalid input stays invalid, as do pixels whose ray is
/// degenerate or whose result is not finite.
pub fn z_to_euclidean(depth: &DepthImage, intrinsics: &PinholeIntrinsics) -> EuclideanDepthImage {
    let mut degenerate = 0usize;
    let out = EuclideanDepthImage::from_fn(depth.width(), depth.height(), |x, y| {
        let z = depth.get(x, y);
        if z == INVALID_DEPTH {
            return 0.0;
        }
        let ray = intrinsics.pixel_ray(x as Real, y as Real);
        let cos = ray.z / ray.norm();
        let r = z as Real / cos;
        if !(cos >= MIN_COS_ANGLE) || !r.is_finite() {
            degenerate += 1;
            return 0.0;
        }
        r as f32
    });
    if degenerate > 0 {
        debug!("{degenerate} pixels with degenerate rays marked invalid");
    }
    out
}
