//! Where a scan's files live on disk.

use std::path::{Path, PathBuf};

use depth_skybox_core::{ImageKind, SkyboxFace, ViewId};

pub const DEFAULT_BASE_DIR: &str = "data/v1/scans";

const CAMERA_PARAMETERS_DIR: &str = "undistorted_camera_parameters";
const COLOR_DIR: &str = "undistorted_color_images";
const DEPTH_DIR: &str = "undistorted_depth_images";
const SKYBOX_DIR: &str = "matterport_skybox_images";
const DEBUG_DIR: &str = "debug";

/// Directory layout of the scan dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    base_dir: PathBuf,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}

impl DatasetLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn scan_dir(&self, scan: &str) -> PathBuf {
        self.base_dir.join(scan)
    }

    pub fn calibration(&self, scan: &str) -> PathBuf {
        self.scan_dir(scan)
            .join(CAMERA_PARAMETERS_DIR)
            .join(format!("{scan}.conf"))
    }

    pub fn color_image(&self, scan: &str, view: &ViewId) -> PathBuf {
        self.scan_dir(scan)
            .join(COLOR_DIR)
            .join(view.file_name(ImageKind::Color))
    }

    pub fn depth_image(&self, scan: &str, view: &ViewId) -> PathBuf {
        self.scan_dir(scan)
            .join(DEPTH_DIR)
            .join(view.file_name(ImageKind::Depth))
    }

    pub fn filled_depth_image(&self, scan: &str, view: &ViewId) -> PathBuf {
        self.scan_dir(scan)
            .join(DEPTH_DIR)
            .join(view.filled_depth_file_name())
    }

    pub fn skybox_dir(&self, scan: &str) -> PathBuf {
        self.scan_dir(scan).join(SKYBOX_DIR)
    }

    /// Color skybox face used as the hole-filling guide.
    pub fn color_skybox(&self, scan: &str, pano: &str, face: SkyboxFace) -> PathBuf {
        self.skybox_dir(scan)
            .join(format!("{pano}_skybox{}_sami.jpg", face.index()))
    }

    /// The depth skybox artifact of one panorama.
    pub fn depth_skybox(&self, scan: &str, pano: &str) -> PathBuf {
        self.skybox_dir(scan)
            .join(format!("{pano}_skybox_depth_small.png"))
    }

    pub fn debug_dir(&self, scan: &str) -> PathBuf {
        self.skybox_dir(scan).join(DEBUG_DIR)
    }

    /// Colormapped render of a finished face.
    pub fn debug_face(&self, scan: &str, pano: &str, face: SkyboxFace) -> PathBuf {
        self.debug_dir(scan)
            .join(format!("{pano}_skybox{}_depth.png", face.index()))
    }

    /// Colormapped render of a face's raw composite.
    pub fn debug_raw_face(&self, scan: &str, pano: &str, face: SkyboxFace) -> PathBuf {
        self.debug_dir(scan)
            .join(format!("{pano}_skybox{}_depth_raw.png", face.index()))
    }
}
