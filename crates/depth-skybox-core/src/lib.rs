//! Core types for building depth skyboxes from a calibrated camera rig.
//!
//! This crate holds the geometry and data model shared by the rest of the
//! workspace:
//! - math aliases and small rotation helpers,
//! - dense image grids (depth, masks, guide images),
//! - pinhole intrinsics and rigid camera poses,
//! - the source-view filename grammar,
//! - the per-scan calibration file parser and panorama records,
//! - the six canonical skybox faces,
//! - deterministic synthetic rigs and images for tests.
//!
//! No image decoding or encoding happens here.

mod calibration;
mod grid;
mod math;
mod models;
mod rig;
mod skybox;
mod view_id;

pub mod synthetic;

pub use calibration::*;
pub use grid::*;
pub use math::*;
pub use models::*;
pub use rig::*;
pub use skybox::*;
pub use view_id::*;
