//! Canonical cube-map faces.
//!
//! Faces are defined relative to a reference camera: the front face shares
//! its orientation and the others are fixed axis permutations of it. The
//! face index order matches the stored color skyboxes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Mat3, PinholeIntrinsics};

pub const NUM_FACES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkyboxFace {
    Top = 0,
    Front = 1,
    Right = 2,
    Back = 3,
    Left = 4,
    Bottom = 5,
}

impl SkyboxFace {
    /// All faces in storage order.
    pub const ALL: [SkyboxFace; NUM_FACES] = [
        SkyboxFace::Top,
        SkyboxFace::Front,
        SkyboxFace::Right,
        SkyboxFace::Back,
        SkyboxFace::Left,
        SkyboxFace::Bottom,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Face camera-to-reference-camera rotation.
    pub fn rotation(self) -> Mat3 {
        match self {
            SkyboxFace::Top => Mat3::new(1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0),
            SkyboxFace::Front => Mat3::identity(),
            SkyboxFace::Right => Mat3::new(0.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0),
            SkyboxFace::Back => Mat3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0),
            SkyboxFace::Left => Mat3::new(0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0),
            SkyboxFace::Bottom => Mat3::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0),
        }
    }

    /// World-to-face rotation given the reference camera's world-to-camera
    /// rotation.
    ///
    /// Face rotations are signed permutations, so their transpose is their
    /// exact inverse.
    pub fn world_to_face(self, reference_wtc: &Mat3) -> Mat3 {
        self.rotation().transpose() * reference_wtc
    }

    /// Intrinsics of a square face image of `size` pixels (90 degree FOV).
    pub fn intrinsics(size: usize) -> PinholeIntrinsics {
        PinholeIntrinsics::ideal(size, size)
    }
}

impl fmt::Display for SkyboxFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkyboxFace::Top => "top",
            SkyboxFace::Front => "front",
            SkyboxFace::Right => "right",
            SkyboxFace::Back => "back",
            SkyboxFace::Left => "left",
            SkyboxFace::Bottom => "bottom",
        };
        write!(f, "{name}")
    }
}
