use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::{Mat3, Real, Vec3};

/// Pinhole intrinsics without skew.
///
/// ```text
/// K = | fx  0   cx |
///     | 0   fy  cy |
///     | 0   0   1  |
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics {
    /// Focal length in pixels along X.
    pub fx: Real,
    /// Focal length in pixels along Y.
    pub fy: Real,
    /// Principal point X coordinate in pixels.
    pub cx: Real,
    /// Principal point Y coordinate in pixels.
    pub cy: Real,
}

impl PinholeIntrinsics {
    pub fn new(fx: Real, fy: Real, cx: Real, cy: Real) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Ideal intrinsics of a `width x height` image with a 90 degree field of
    /// view and a centred principal point.
    pub fn ideal(width: usize, height: usize) -> Self {
        let w = width as Real / 2.0;
        let h = height as Real / 2.0;
        Self {
            fx: w,
            fy: h,
            cx: w,
            cy: h,
        }
    }

    /// True when both focal lengths are finite and strictly positive and the
    /// principal point is finite.
    pub fn is_valid(&self) -> bool {
        self.fx.is_finite()
            && self.fy.is_finite()
            && self.fx > 0.0
            && self.fy > 0.0
            && self.cx.is_finite()
            && self.cy.is_finite()
    }

    /// Return the 3x3 camera intrinsics matrix K.
    pub fn k_matrix(&self) -> Mat3 {
        Mat3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Closed-form K^-1; callers must only use it on valid intrinsics.
    pub fn k_inverse(&self) -> Mat3 {
        Mat3::new(
            1.0 / self.fx,
            0.0,
            -self.cx / self.fx,
            0.0,
            1.0 / self.fy,
            -self.cy / self.fy,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Convert pixel coordinates into normalized coordinates on the z = 1 plane.
    pub fn pixel_to_normalized(&self, pixel: &Vector2<Real>) -> Vector2<Real> {
        Vector2::new((pixel.x - self.cx) / self.fx, (pixel.y - self.cy) / self.fy)
    }

    /// Viewing ray through a pixel, scaled so that `z == 1`.
    pub fn pixel_ray(&self, x: Real, y: Real) -> Vec3 {
        let n = self.pixel_to_normalized(&Vector2::new(x, y));
        Vec3::new(n.x, n.y, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_matches_nalgebra() {
        let k = PinholeIntrinsics::new(1075.0, 1074.5, 629.7, 522.3);
        let inv = k.k_matrix().try_inverse().unwrap();
        assert!((inv - k.k_inverse()).norm() < 1e-12);
    }

    #[test]
    fn ideal_intrinsics_span_ninety_degrees() {
        let k = PinholeIntrinsics::ideal(1024, 1024);
        let edge = k.pixel_ray(1024.0, 512.0);
        assert!((edge.x - 1.0).abs() < 1e-12);
        assert!(edge.y.abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_focal_length() {
        assert!(!PinholeIntrinsics::new(0.0, 500.0, 320.0, 240.0).is_valid());
        assert!(!PinholeIntrinsics::new(500.0, Real::NAN, 320.0, 240.0).is_valid());
        assert!(PinholeIntrinsics::new(500.0, 500.0, 320.0, 240.0).is_valid());
    }
}
