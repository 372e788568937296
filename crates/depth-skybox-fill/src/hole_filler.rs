//! Hole filling for 16-bit depth images.

use depth_skybox_core::{DepthImage, GrayImage, INVALID_DEPTH, Mask};
use log::debug;

use crate::{CrossBilateralParams, FillError, cross_bilateral_fill, match_guide};

/// Depth quantized to 8 bits together with the scale needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedDepth {
    pub levels: GrayImage,
    /// Pixels whose level is `0`: missing depth and measurements too small to
    /// survive quantization.
    pub holes: Mask,
    /// Largest depth in the original image.
    pub max_depth: u16,
}

impl QuantizedDepth {
    /// `q = floor(min(d / (max + 1), 1) * 255)`.
    pub fn new(depth: &DepthImage) -> Self {
        let max_depth = depth.max_value().unwrap_or(INVALID_DEPTH);
        let scale = max_depth as f64 + 1.0;
        let levels = depth.map(|d| ((d as f64 / scale).min(1.0) * 255.0) as u8);
        let holes = levels.map(|q| u8::from(q == 0));
        Self {
            levels,
            holes,
            max_depth,
        }
    }

    /// `floor(q / 255 * (max + 1))`, clamped to `max`.
    pub fn restore(&self, levels: &GrayImage) -> DepthImage {
        let scale = self.max_depth as f64 + 1.0;
        let max = self.max_depth as f64;
        levels.map(|q| (q as f64 / 255.0 * scale).floor().min(max) as u16)
    }
}

/// Fills missing depth guided by a grayscale image of the same scene.
#[derive(Debug, Clone, Default)]
pub struct HoleFiller {
    params: CrossBilateralParams,
}

impl HoleFiller {
    pub fn new(params: CrossBilateralParams) -> Result<Self, FillError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Fill the zero pixels of `depth`.
    ///
    /// The guide is resized to the depth resolution when needed. Measured
    /// pixels come back within one quantization step of their input, except
    /// those below one step, which are filled like missing ones. An image
    /// without any measurement is returned as is.
    pub fn fill(&self, depth: &DepthImage, guide: &GrayImage) -> Result<DepthImage, FillError> {
        let quantized = QuantizedDepth::new(depth);
        if quantized.max_depth == INVALID_DEPTH {
            debug!("depth image has no measurements, nothing to fill");
            return Ok(depth.clone());
        }
        let (width, height) = depth.dimensions();
        let guide = if guide.dimensions() == (width, height) {
            guide.clone()
        } else {
            debug!(
                "resizing guide from {}x{} to {width}x{height}",
                guide.width(),
                guide.height()
            );
            match_guide(guide, width, height)
        };
        let filled = cross_bilateral_fill(&quantized.levels, &guide, &quantized.holes, &self.params)?;
        Ok(quantized.restore(&filled))
    }
}
