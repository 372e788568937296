//! Undistorted camera parameter files.
//!
//! A scan's calibration file lists, for every camera stack of every
//! panorama, one intrinsics line followed by the six poses of that stack:
//!
//! ```text
//! dataset matterport
//! n_images 108
//! intrinsics_matrix <fx> 0 <cx> 0 <fy> <cy> 0 0 1
//! scan <pano>_d0_0.png <pano>_i0_0.jpg <16 floats, row-major camera-to-world>
//! ... five more scan lines for angles 1..5 ...
//! ```
//!
//! Lines outside a camera block that are neither `intrinsics_matrix` nor
//! `scan` (the file header) are ignored. Everything inside a block is strict.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::{
    CameraExtrinsics, ImageKind, Mat4, NUM_ANGLES, NUM_STACKS, PanoramaRecord, PinholeIntrinsics,
    RigView, StackId, ViewId, ViewIdError, ViewToken,
};

const INTRINSICS_KEYWORD: &str = "intrinsics_matrix";
const SCAN_KEYWORD: &str = "scan";

/// Errors raised while loading camera parameters.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// The calibration file could not be read.
    #[error("failed to read calibration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A line does not follow the calibration grammar.
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    /// An image filename token could not be parsed.
    #[error("line {line}: {source}")]
    ViewToken {
        line: usize,
        #[source]
        source: ViewIdError,
    },
    /// A panorama lacks intrinsics for one of its stacks.
    #[error("no intrinsics for camera stack {} of panorama {}", .0.stack, .0.pano)]
    MissingIntrinsics(StackId),
    /// A panorama lacks the pose of one of its views.
    #[error("no extrinsics for view {0}")]
    MissingView(ViewId),
}

impl CalibrationError {
    /// True for failures to access the file rather than to understand it.
    pub fn is_io(&self) -> bool {
        matches!(self, CalibrationError::Io { .. })
    }

    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CalibrationError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Intrinsics per camera stack and extrinsics per view for one scan.
#[derive(Debug, Clone, Default)]
pub struct CameraParameters {
    pub intrinsics: BTreeMap<StackId, PinholeIntrinsics>,
    pub extrinsics: BTreeMap<ViewId, CameraExtrinsics>,
}

struct OpenBlock {
    line: usize,
    intrinsics: PinholeIntrinsics,
    views: Vec<(ViewId, CameraExtrinsics)>,
}

impl CameraParameters {
    /// Read and parse a calibration file.
    pub fn load(path: &Path) -> Result<Self, CalibrationError> {
        let text = std::fs::read_to_string(path).map_err(|source| CalibrationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse calibration text.
    pub fn parse(text: &str) -> Result<Self, CalibrationError> {
        let mut params = CameraParameters::default();
        let mut block: Option<OpenBlock> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let mut tokens = raw.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };

            match keyword {
                INTRINSICS_KEYWORD => {
                    if let Some(open) = &block {
                        return Err(unfinished_block(open));
                    }
                    let intrinsics = parse_intrinsics(line, tokens)?;
                    block = Some(OpenBlock {
                        line,
                        intrinsics,
                        views: Vec::with_capacity(NUM_ANGLES as usize),
                    });
                }
                SCAN_KEYWORD => {
                    let Some(open) = block.as_mut() else {
                        return Err(CalibrationError::malformed(
                            line,
                            "`scan` line without a preceding `intrinsics_matrix` line",
                        ));
                    };
                    open.views.push(parse_scan(line, tokens)?);
                    if open.views.len() == NUM_ANGLES as usize {
                        if let Some(done) = block.take() {
                            params.close_block(done)?;
                        }
                    }
                }
                other => {
                    if let Some(open) = &block {
                        return Err(CalibrationError::malformed(
                            line,
                            format!(
                                "unexpected `{other}` inside the camera block opened at line {}",
                                open.line
                            ),
                        ));
                    }
                }
            }
        }

        if let Some(open) = &block {
            return Err(unfinished_block(open));
        }

        debug!(
            "parsed {} camera stacks and {} views",
            params.intrinsics.len(),
            params.extrinsics.len()
        );
        Ok(params)
    }

    fn close_block(&mut self, block: OpenBlock) -> Result<(), CalibrationError> {
        let stack = block.views[0].0.stack_id();
        let mut angles = BTreeSet::new();
        for (view, _) in &block.views {
            if view.stack_id() != stack {
                return Err(CalibrationError::malformed(
                    block.line,
                    format!(
                        "camera block mixes views {} and {}",
                        block.views[0].0, view
                    ),
                ));
            }
            if !angles.insert(view.angle) {
                return Err(CalibrationError::malformed(
                    block.line,
                    format!("camera block lists view {view} twice"),
                ));
            }
        }

        if self.intrinsics.insert(stack.clone(), block.intrinsics).is_some() {
            return Err(CalibrationError::malformed(
                block.line,
                format!(
                    "camera stack {} of panorama {} is defined twice",
                    stack.stack, stack.pano
                ),
            ));
        }
        for (view, extrinsics) in block.views {
            if self.extrinsics.insert(view.clone(), extrinsics).is_some() {
                return Err(CalibrationError::malformed(
                    block.line,
                    format!("view {view} is defined twice"),
                ));
            }
        }
        Ok(())
    }

    /// Panorama ids present in the file, sorted.
    pub fn panorama_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self.intrinsics.keys().map(|s| s.pano.as_str()).collect();
        ids.into_iter().map(str::to_string).collect()
    }

    /// Gather the full rig of one panorama.
    pub fn panorama(&self, pano: &str) -> Result<PanoramaRecord, CalibrationError> {
        let mut stacks = Vec::with_capacity(NUM_STACKS as usize);
        for stack in 0..NUM_STACKS {
            let id = StackId {
                pano: pano.to_string(),
                stack,
            };
            let k = self
                .intrinsics
                .get(&id)
                .ok_or(CalibrationError::MissingIntrinsics(id))?;
            stacks.push(*k);
        }

        let mut views = Vec::with_capacity(crate::VIEWS_PER_PANORAMA);
        for id in ViewId::rig_order(pano) {
            let Some(extrinsics) = self.extrinsics.get(&id) else {
                return Err(CalibrationError::MissingView(id));
            };
            views.push(RigView {
                intrinsics: stacks[id.stack as usize],
                extrinsics: *extrinsics,
                id,
            });
        }
        Ok(PanoramaRecord::new(pano.to_string(), views))
    }
}

fn unfinished_block(block: &OpenBlock) -> CalibrationError {
    CalibrationError::malformed(
        block.line,
        format!(
            "camera block has {} of {} scan lines",
            block.views.len(),
            NUM_ANGLES
        ),
    )
}

fn parse_floats<'a>(
    line: usize,
    tokens: impl Iterator<Item = &'a str>,
    expected: usize,
    what: &str,
) -> Result<Vec<f64>, CalibrationError> {
    let mut values = Vec::with_capacity(expected);
    for tok in tokens {
        let v: f64 = tok.parse().map_err(|_| {
            CalibrationError::malformed(line, format!("`{tok}` is not a number in {what}"))
        })?;
        if !v.is_finite() {
            return Err(CalibrationError::malformed(
                line,
                format!("non-finite value `{tok}` in {what}"),
            ));
        }
        values.push(v);
    }
    if values.len() != expected {
        return Err(CalibrationError::malformed(
            line,
            format!("{what} needs {expected} values, got {}", values.len()),
        ));
    }
    Ok(values)
}

fn parse_intrinsics<'a>(
    line: usize,
    tokens: impl Iterator<Item = &'a str>,
) -> Result<PinholeIntrinsics, CalibrationError> {
    let v = parse_floats(line, tokens, 9, "intrinsics matrix")?;
    let k = PinholeIntrinsics::new(v[0], v[4], v[2], v[5]);
    if !k.is_valid() {
        return Err(CalibrationError::malformed(
            line,
            format!("degenerate intrinsics fx={} fy={}", k.fx, k.fy),
        ));
    }
    Ok(k)
}

fn parse_scan<'a>(
    line: usize,
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<(ViewId, CameraExtrinsics), CalibrationError> {
    let (Some(depth_token), Some(color_token)) = (tokens.next(), tokens.next()) else {
        return Err(CalibrationError::malformed(
            line,
            "`scan` line needs depth and color image names",
        ));
    };
    let token_err = |source| CalibrationError::ViewToken { line, source };
    let depth = ViewToken::parse(depth_token).map_err(token_err)?;
    let color = ViewToken::parse(color_token).map_err(token_err)?;
    if depth.kind != ImageKind::Depth || color.kind != ImageKind::Color {
        return Err(CalibrationError::malformed(
            line,
            "`scan` line must list the depth image before the color image",
        ));
    }
    if depth.view != color.view {
        return Err(CalibrationError::malformed(
            line,
            format!(
                "depth image names view {} but color image names view {}",
                depth.view, color.view
            ),
        ));
    }

    let v = parse_floats(line, tokens, 16, "camera-to-world matrix")?;
    let extrinsics = CameraExtrinsics::from_camera_to_world(Mat4::from_row_slice(&v))
        .ok_or_else(|| CalibrationError::malformed(line, "camera-to-world matrix is singular"))?;
    Ok((color.view, extrinsics))
}
