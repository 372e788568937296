//! Perspective warps with the sampling rules depth images need.
//!
//! Both warps iterate destination pixels and map them back into the source
//! through the inverse homography. Depth is sampled with nearest neighbour so
//! that no value is ever blended from two measurements.

use depth_skybox_core::{Grid, Mask, Mat3, Pt2, Real};

use crate::{ImgprocError, apply_homography};

/// Inverse mapping of destination pixels into source pixel coordinates.
struct InverseMap {
    h_inv: Mat3,
}

impl InverseMap {
    fn new(h: &Mat3) -> Result<Self, ImgprocError> {
        let h_inv = h.try_inverse().ok_or(ImgprocError::SingularHomography)?;
        if h_inv.iter().any(|v| !v.is_finite()) {
            return Err(ImgprocError::SingularHomography);
        }
        Ok(Self { h_inv })
    }

    /// Source coordinates of destination pixel `(x, y)`.
    ///
    /// `None` when the destination ray lies behind the source camera: the
    /// homogeneous scale equals the ray's depth in the source frame.
    #[inline]
    fn source(&self, x: usize, y: usize) -> Option<(Real, Real)> {
        apply_homography(&self.h_inv, &Pt2::new(x as Real, y as Real)).map(|p| (p.x, p.y))
    }
}

/// Warp `src` by `h` (source to destination) with nearest-neighbour
/// sampling. Destination pixels mapping outside the source are `0`.
pub fn warp_perspective_nearest(
    src: &Grid<f32>,
    h: &Mat3,
    width: usize,
    height: usize,
) -> Result<Grid<f32>, ImgprocError> {
    let map = InverseMap::new(h)?;
    Ok(Grid::from_fn(width, height, |x, y| {
        let Some((sx, sy)) = map.source(x, y) else {
            return 0.0;
        };
        src.get_checked(sx.round() as isize, sy.round() as isize)
            .unwrap_or(0.0)
    }))
}

/// Coverage of a `src_width x src_height` image warped by `h`.
///
/// Equivalent to bilinearly warping an all-ones image with a zero border and
/// keeping the pixels whose value is exactly one: a pixel is covered when
/// every bilinear tap with non-zero weight lies inside the source.
pub fn warp_coverage(
    h: &Mat3,
    src_width: usize,
    src_height: usize,
    width: usize,
    height: usize,
) -> Result<Mask, ImgprocError> {
    let map = InverseMap::new(h)?;
    Ok(Mask::from_fn(width, height, |x, y| {
        let Some((sx, sy)) = map.source(x, y) else {
            return 0;
        };
        u8::from(taps_inside(sx, src_width) && taps_inside(sy, src_height))
    }))
}

/// Sub-pixel resolution of bilinear tap weights.
const TAP_RESOLUTION: Real = 32.0;

#[inline]
fn taps_inside(s: Real, len: usize) -> bool {
    // Weights are quantized to 1/32 px, so a tap whose weight rounds to zero
    // does not count.
    let q = (s * TAP_RESOLUTION).round();
    let lo = (q / TAP_RESOLUTION).floor();
    if lo < 0.0 {
        return false;
    }
    let hi = if q > lo * TAP_RESOLUTION { lo + 1.0 } else { lo };
    hi < len as Real
}
