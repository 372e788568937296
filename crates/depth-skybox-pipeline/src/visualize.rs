//! Colormapped debug renders of depth faces.

use depth_skybox_core::{CompositeBuffer, DepthImage, Grid, SkyboxFace};
use log::warn;

use crate::io::save_rgb_png;
use crate::{DatasetLayout, PanoramaObserver};

/// JET colormap: dark blue through cyan, yellow and red to dark red.
pub fn jet(level: u8) -> [u8; 3] {
    let v = level as f64 / 255.0;
    let channel = |centre: f64| ((1.5 - (4.0 * v - centre).abs()).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(3.0), channel(2.0), channel(1.0)]
}

/// Interleaved RGB render of a depth grid, normalized by `max + 1`.
pub fn render_jet(depth: &Grid<u16>) -> Vec<u8> {
    let scale = depth.max_value().unwrap_or(0) as f64 + 1.0;
    depth
        .as_slice()
        .iter()
        .flat_map(|&d| jet((d as f64 / scale * 255.0) as u8))
        .collect()
}

/// Writes JET renders of every face to the scan's debug directory.
///
/// Write failures are logged and otherwise ignored; debug output never
/// fails a panorama.
#[derive(Debug, Clone)]
pub struct DebugRenderer {
    layout: DatasetLayout,
    scan: String,
    written: usize,
}

impl DebugRenderer {
    pub fn new(layout: DatasetLayout, scan: impl Into<String>) -> Self {
        Self {
            layout,
            scan: scan.into(),
            written: 0,
        }
    }

    /// Number of renders written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn write(&mut self, path: std::path::PathBuf, depth: &Grid<u16>) {
        match save_rgb_png(&path, depth.width(), depth.height(), render_jet(depth)) {
            Ok(()) => self.written += 1,
            Err(e) => warn!("debug render {} failed: {e}", path.display()),
        }
    }
}

impl PanoramaObserver for DebugRenderer {
    fn raw_face(&mut self, pano: &str, face: SkyboxFace, composite: &CompositeBuffer) {
        let path = self.layout.debug_raw_face(&self.scan, pano, face);
        self.write(path, &composite.flip_horizontal());
    }

    fn finished_face(&mut self, pano: &str, face: SkyboxFace, depth: &DepthImage) {
        let path = self.layout.debug_face(&self.scan, pano, face);
        self.write(path, depth);
    }
}
