//! Run configuration.

use std::path::Path;

use depth_skybox_fill::CrossBilateralParams;
use serde::{Deserialize, Serialize};

use crate::{PipelineError, Result};

/// Settings fixed for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    /// Side of the square working faces the source views are composited into.
    pub skybox_size: usize,
    /// Side of each stored face.
    pub output_size: usize,
    /// Fill holes in the downsampled faces.
    pub fill_holes: bool,
    /// Scans processed concurrently.
    pub workers: usize,
    /// Write colormapped debug renders next to the outputs.
    pub visualize: bool,
    /// Cross bilateral filter settings for hole filling.
    pub filter: CrossBilateralParams,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            skybox_size: 1024,
            output_size: 512,
            fill_holes: true,
            workers: 20,
            visualize: false,
            filter: CrossBilateralParams::default(),
        }
    }
}

impl SkyboxConfig {
    /// Load a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.skybox_size == 0 || self.output_size == 0 {
            return Err(PipelineError::Config(
                "face sizes must be positive".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::Config(
                "at least one worker is required".to_string(),
            ));
        }
        self.filter
            .validate()
            .map_err(|e| PipelineError::Config(e.to_string()))
    }
}
