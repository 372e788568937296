use serde::{Deserialize, Serialize};

use crate::{Mat3, Mat4, rotation_block};

/// Rigid camera pose: camera-to-world and its inverse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraExtrinsics {
    /// `T_ctw`, maps camera coordinates into world coordinates.
    pub camera_to_world: Mat4,
    /// `T_wtc`, the inverse of `camera_to_world`.
    pub world_to_camera: Mat4,
}

impl CameraExtrinsics {
    /// Build from a camera-to-world transform.
    ///
    /// Returns `None` when the matrix is not invertible or not finite.
    pub fn from_camera_to_world(camera_to_world: Mat4) -> Option<Self> {
        if camera_to_world.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let world_to_camera = camera_to_world.try_inverse()?;
        Some(Self {
            camera_to_world,
            world_to_camera,
        })
    }

    /// Rotation part of `T_ctw`.
    pub fn rotation_ctw(&self) -> Mat3 {
        rotation_block(&self.camera_to_world)
    }

    /// Rotation part of `T_wtc`; for a rigid transform this is the inverse of
    /// [`Self::rotation_ctw`].
    pub fn rotation_wtc(&self) -> Mat3 {
        rotation_block(&self.world_to_camera)
    }
}
