//! Depth skybox pipelines over a scan dataset.
//!
//! The per-panorama flow is
//!
//! ```text
//! calibration -> linearize views -> project onto faces -> downsample
//!             -> fill holes (color skybox guide) -> concatenate -> PNG
//! ```
//!
//! [`run_skybox_batch`] runs it for every scan of a manifest on a bounded
//! worker pool and reports one [`ScanOutcome`] per scan. [`run_fill_batch`]
//! writes hole-filled copies of the source depth views instead.
//!
//! ```no_run
//! use depth_skybox_pipeline::{DatasetLayout, SkyboxConfig, read_manifest, run_skybox_batch};
//! # fn main() -> Result<(), depth_skybox_pipeline::PipelineError> {
//! let scans = read_manifest("connectivity/scans.txt".as_ref())?;
//! let report = run_skybox_batch(&DatasetLayout::default(), &scans, &SkyboxConfig::default())?;
//! println!("{} scans completed", report.completed());
//! # Ok(())
//! # }
//! ```

mod batch;
mod config;
mod error;
pub mod io;
mod layout;
mod panorama;
mod projector;
mod scan;
mod visualize;

pub use batch::*;
pub use config::*;
pub use error::*;
pub use layout::*;
pub use panorama::*;
pub use projector::*;
pub use scan::*;
pub use visualize::*;
