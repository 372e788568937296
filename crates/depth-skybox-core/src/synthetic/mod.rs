//! Deterministic synthetic data generation helpers.
//!
//! Small building blocks for synthetic rigs, depth images and guide images.
//! They are used by tests across the workspace and are handy for
//! reproducing pipeline behaviour without a dataset on disk.

mod noise;
mod scene;

pub use noise::*;
pub use scene::*;
