//! Per-panorama rig geometry.

use serde::{Deserialize, Serialize};

use crate::{CameraExtrinsics, Mat3, PinholeIntrinsics, ViewId};

/// Stack and angle of the view that shares the orientation of the front
/// skybox face.
pub const REFERENCE_VIEW: (u8, u8) = (1, 5);

/// Calibration of one source view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigView {
    pub id: ViewId,
    pub intrinsics: PinholeIntrinsics,
    pub extrinsics: CameraExtrinsics,
}

/// All source views of one panoramic viewpoint, in rig order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanoramaRecord {
    pano: String,
    views: Vec<RigView>,
}

impl PanoramaRecord {
    /// Build a record; views are sorted into rig order.
    pub fn new(pano: String, mut views: Vec<RigView>) -> Self {
        views.sort_by(|a, b| a.id.cmp(&b.id));
        Self { pano, views }
    }

    pub fn pano(&self) -> &str {
        &self.pano
    }

    pub fn views(&self) -> &[RigView] {
        &self.views
    }

    pub fn view(&self, stack: u8, angle: u8) -> Option<&RigView> {
        self.views
            .iter()
            .find(|v| v.id.stack == stack && v.id.angle == angle)
    }

    /// Id of the view the skybox faces are anchored to.
    pub fn reference_view_id(&self) -> ViewId {
        let (stack, angle) = REFERENCE_VIEW;
        ViewId::new(self.pano.as_str(), stack, angle)
    }

    /// World-to-camera rotation of the view the skybox faces are anchored to,
    /// `None` when the record lacks that view.
    pub fn reference_rotation_wtc(&self) -> Option<Mat3> {
        let (stack, angle) = REFERENCE_VIEW;
        self.view(stack, angle).map(|v| v.extrinsics.rotation_wtc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::synthetic_panorama;

    #[test]
    fn reference_rotation_comes_from_the_reference_view() {
        let record = synthetic_panorama("p", PinholeIntrinsics::ideal(32, 32));
        let view = record.view(1, 5).unwrap();
        assert_eq!(
            record.reference_rotation_wtc(),
            Some(view.extrinsics.rotation_wtc())
        );
    }

    #[test]
    fn missing_reference_view_has_no_rotation() {
        let record = synthetic_panorama("p", PinholeIntrinsics::ideal(32, 32));
        let views = record
            .views()
            .iter()
            .filter(|v| v.id != record.reference_view_id())
            .cloned()
            .collect();
        let partial = PanoramaRecord::new("p".to_string(), views);
        assert_eq!(partial.views().len(), crate::VIEWS_PER_PANORAMA - 1);
        assert!(partial.reference_rotation_wtc().is_none());
    }
}
