use nalgebra::{Matrix3, Matrix4, Point2, Vector3};

pub type Real = f64;

pub type Vec3 = Vector3<Real>;
pub type Pt2 = Point2<Real>;
pub type Mat3 = Matrix3<Real>;
pub type Mat4 = Matrix4<Real>;

pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Optical axis of a camera in its own frame.
pub fn forward_axis() -> Vec3 {
    Vec3::new(0.0, 0.0, 1.0)
}

/// Upper-left 3x3 block of a homogeneous rigid transform.
pub fn rotation_block(t: &Mat4) -> Mat3 {
    t.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Rotation by `angle` radians about the camera y axis.
pub fn yaw_rotation(angle: Real) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c)
}

/// Rotation by `angle` radians about the camera x axis.
pub fn pitch_rotation(angle: Real) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
}

/// Build a rigid 4x4 transform from a rotation and translation.
pub fn rigid_transform(rotation: &Mat3, translation: &Vec3) -> Mat4 {
    let mut t = Mat4::identity();
    t.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
    t.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    t
}
