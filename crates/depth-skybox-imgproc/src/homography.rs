//! Rotation-only homographies between cameras sharing an optical centre.

use depth_skybox_core::{
    Mat3, PinholeIntrinsics, Pt2, Vec3, forward_axis, from_homogeneous, to_homogeneous,
};

/// Homography mapping source pixels to target pixels for two cameras that
/// differ only by rotation:
///
/// ```text
/// H = K_dst * R_dst_wtc * R_src_ctw * K_src^-1
/// ```
pub fn rotation_homography(
    k_src: &PinholeIntrinsics,
    r_src_ctw: &Mat3,
    k_dst: &PinholeIntrinsics,
    r_dst_wtc: &Mat3,
) -> Mat3 {
    k_dst.k_matrix() * r_dst_wtc * r_src_ctw * k_src.k_inverse()
}

/// Whether the optical axes of two cameras lie in the same half-space.
///
/// A source is rejected only when the dot product is strictly negative, so
/// perpendicular views still contribute.
pub fn faces_toward(src_ctw: &Mat3, dst_ctw: &Mat3) -> bool {
    let a: Vec3 = src_ctw * forward_axis();
    let b: Vec3 = dst_ctw * forward_axis();
    a.dot(&b) >= 0.0
}

/// Apply a rotation homography to a pixel.
///
/// The homogeneous scale is the depth of the ray in the target camera, so
/// `None` is returned when the point lies behind it or at infinity.
pub fn apply_homography(h: &Mat3, p: &Pt2) -> Option<Pt2> {
    let v = h * to_homogeneous(p);
    if !(v.z > 0.0) {
        return None;
    }
    let q = from_homogeneous(&v);
    (q.x.is_finite() && q.y.is_finite()).then_some(q)
}
