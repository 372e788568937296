//! Multi-scale cross bilateral filter for filling depth holes.
//!
//! The filter builds a pyramid by point-sampling the full-resolution inputs,
//! fills holes at the coarsest level first, and seeds each finer level with
//! the coarser estimates before filtering it again. Neighbours are weighted
//! by spatial distance and by similarity in the guide image, so fills follow
//! edges of the color image instead of bleeding across them.

use depth_skybox_core::{GrayImage, Mask};
use log::debug;

use crate::{CrossBilateralParams, FillError};

/// One pyramid level, row-major.
struct Level {
    width: usize,
    height: usize,
    depth: Vec<f32>,
    intensity: Vec<f32>,
    missing: Vec<bool>,
    valid: Vec<bool>,
    result: Vec<f32>,
}

impl Level {
    fn full(depth: &GrayImage, guide: &GrayImage, holes: &Mask) -> Self {
        let missing: Vec<bool> = holes.as_slice().iter().map(|&m| m != 0).collect();
        Self {
            width: depth.width(),
            height: depth.height(),
            depth: depth.as_slice().iter().map(|&d| d as f32 / 255.0).collect(),
            intensity: guide.as_slice().iter().map(|&i| i as f32 / 255.0).collect(),
            valid: missing.iter().map(|m| !m).collect(),
            result: vec![0.0; missing.len()],
            missing,
        }
    }

    /// Point-sample `full` down to `width x height`.
    fn sampled(full: &Level, width: usize, height: usize) -> Self {
        let n = width * height;
        let mut level = Self {
            width,
            height,
            depth: Vec::with_capacity(n),
            intensity: Vec::with_capacity(n),
            missing: Vec::with_capacity(n),
            valid: Vec::with_capacity(n),
            result: vec![0.0; n],
        };
        for y in 0..height {
            let sy = scaled_index(y, height, full.height);
            for x in 0..width {
                let sx = scaled_index(x, width, full.width);
                let i = sy * full.width + sx;
                level.depth.push(full.depth[i]);
                level.intensity.push(full.intensity[i]);
                level.missing.push(full.missing[i]);
                level.valid.push(!full.missing[i]);
            }
        }
        level
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fill the level's holes from usable neighbours.
    ///
    /// Usability is frozen at the start of the pass: pixels filled during
    /// this pass do not feed their neighbours until the next level.
    fn filter(&mut self, radius: usize, sigma_s: f32, sigma_r: f32) {
        let spatial = spatial_kernel(radius, sigma_s);
        let usable: Vec<bool> = self
            .missing
            .iter()
            .zip(&self.valid)
            .map(|(&m, &v)| !m || v)
            .collect();
        let side = 2 * radius + 1;
        let r = radius as isize;

        for y in 0..self.height {
            for x in 0..self.width {
                let p = y * self.width + x;
                if !self.missing[p] {
                    continue;
                }
                let ip = self.intensity[p];
                let mut weight_sum = 0.0f32;
                let mut value_sum = 0.0f32;
                for dy in -r..=r {
                    let qy = y as isize + dy;
                    if qy < 0 || qy >= self.height as isize {
                        continue;
                    }
                    for dx in -r..=r {
                        let qx = x as isize + dx;
                        if qx < 0 || qx >= self.width as isize {
                            continue;
                        }
                        let q = qy as usize * self.width + qx as usize;
                        if !usable[q] {
                            continue;
                        }
                        let di = self.intensity[q] - ip;
                        let range = (-(di * di) / (2.0 * sigma_r * sigma_r)).exp();
                        let k = (dy + r) as usize * side + (dx + r) as usize;
                        let w = spatial[k] * range;
                        weight_sum += w;
                        value_sum += self.depth[q] * w;
                    }
                }
                if weight_sum == 0.0 {
                    continue;
                }
                self.result[p] = value_sum / weight_sum;
                self.valid[p] = true;
            }
        }
    }

    /// Seed this level's holes from the next coarser level.
    fn seed_from(&mut self, coarse: &Level) {
        if coarse.is_empty() {
            return;
        }
        for y in 0..self.height {
            let sy = scaled_index(y, self.height, coarse.height);
            for x in 0..self.width {
                let p = y * self.width + x;
                if !self.missing[p] {
                    continue;
                }
                let sx = scaled_index(x, self.width, coarse.width);
                let s = sy * coarse.width + sx;
                self.depth[p] = if coarse.missing[s] {
                    coarse.result[s]
                } else {
                    coarse.depth[s]
                };
                self.valid[p] = coarse.valid[s];
            }
        }
    }
}

/// Index in an axis of length `to` matching index `i` of an axis of length `from`.
#[inline]
fn scaled_index(i: usize, from: usize, to: usize) -> usize {
    let s = (i as f32 * to as f32 / from as f32) as usize;
    s.min(to.saturating_sub(1))
}

/// Normalized Gaussian over a `(2r+1)^2` window, row-major.
fn spatial_kernel(radius: usize, sigma: f32) -> Vec<f32> {
    let r = radius as isize;
    let mut kernel = Vec::with_capacity((2 * radius + 1).pow(2));
    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = (dx * dx + dy * dy) as f32;
            kernel.push((-d2 / (2.0 * sigma * sigma)).exp());
        }
    }
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// Fill the pixels flagged in `holes` of an 8-bit depth image.
///
/// Pixels outside `holes` are returned unchanged. Holes that no level could
/// reach come back as `0`.
pub fn cross_bilateral_fill(
    depth: &GrayImage,
    guide: &GrayImage,
    holes: &Mask,
    params: &CrossBilateralParams,
) -> Result<GrayImage, FillError> {
    params.validate()?;
    let (width, height) = depth.dimensions();
    for (what, img) in [("guide", guide), ("hole mask", holes)] {
        if img.dimensions() != (width, height) {
            return Err(FillError::SizeMismatch {
                what,
                width,
                height,
                actual_w: img.width(),
                actual_h: img.height(),
            });
        }
    }

    let mut levels = vec![Level::full(depth, guide, holes)];
    for s in 1..params.num_scales() {
        let level = Level::sampled(&levels[0], width >> s, height >> s);
        levels.push(level);
    }

    for s in (0..levels.len()).rev() {
        levels[s].filter(params.radius, params.sigma_spatial[s], params.sigma_range[s]);
        if s > 0 {
            let (finer, coarser) = levels.split_at_mut(s);
            finer[s - 1].seed_from(&coarser[0]);
        }
    }

    let finest = &levels[0];
    let mut unfilled = 0usize;
    let out = GrayImage::from_fn(width, height, |x, y| {
        let p = y * width + x;
        if finest.missing[p] {
            if !finest.valid[p] {
                unfilled += 1;
            }
            (finest.result[p] * 255.0) as u8
        } else {
            depth.get(x, y)
        }
    });
    debug!(
        "cross bilateral fill: {} holes, {unfilled} left unfilled",
        holes.as_slice().iter().filter(|&&m| m != 0).count()
    );
    Ok(out)
}
