//! Reprojection of source depth views onto skybox faces.
//!
//! Projection runs in two phases. [`SkyboxProjector::plan`] decides, per
//! face, which source views contribute and with which homography. The plan
//! is an explicit ordered list, so compositing order is inspectable and
//! testable on its own. [`SkyboxProjector::apply`] then warps and composites
//! each operation in sequence; later operations overwrite earlier ones.

use depth_skybox_core::{
    CompositeBuffer, EuclideanDepthImage, Mat3, NUM_FACES, PinholeIntrinsics, SkyboxFace, ViewId,
};
use depth_skybox_imgproc::{
    erode3x3, faces_toward, rotation_homography, warp_coverage, warp_perspective_nearest,
};
use log::debug;

use crate::Result;

/// One linearized source view ready for projection.
#[derive(Debug, Clone)]
pub struct SourceView {
    pub id: ViewId,
    pub intrinsics: PinholeIntrinsics,
    /// Camera-to-world rotation.
    pub rotation_ctw: Mat3,
    pub depth: EuclideanDepthImage,
}

/// Composite one source view into one face.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOp {
    pub view: ViewId,
    /// Index of the view in the source slice handed to the projector.
    pub source: usize,
    /// Source pixels to face pixels.
    pub homography: Mat3,
}

/// Ordered operations for one face.
#[derive(Debug, Clone, PartialEq)]
pub struct FacePlan {
    pub face: SkyboxFace,
    pub ops: Vec<CompositeOp>,
}

/// Projects source views onto the six faces of a skybox.
#[derive(Debug, Clone)]
pub struct SkyboxProjector {
    size: usize,
    reference_wtc: Mat3,
}

impl SkyboxProjector {
    /// `reference_wtc` is the world-to-camera rotation of the view the front
    /// face is aligned with.
    pub fn new(size: usize, reference_wtc: Mat3) -> Self {
        Self {
            size,
            reference_wtc,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Face camera-to-world rotation.
    pub fn face_ctw(&self, face: SkyboxFace) -> Mat3 {
        self.reference_wtc.transpose() * face.rotation()
    }

    /// Build the compositing plan. Sources are taken in slice order, which
    /// callers keep in rig order.
    pub fn plan(&self, sources: &[SourceView]) -> Vec<FacePlan> {
        let k_face = SkyboxFace::intrinsics(self.size);
        SkyboxFace::ALL
            .iter()
            .map(|&face| {
                let face_ctw = self.face_ctw(face);
                let face_wtc = face.world_to_face(&self.reference_wtc);
                let ops = sources
                    .iter()
                    .enumerate()
                    .filter_map(|(source, view)| {
                        if !faces_toward(&view.rotation_ctw, &face_ctw) {
                            return None;
                        }
                        let homography = rotation_homography(
                            &view.intrinsics,
                            &view.rotation_ctw,
                            &k_face,
                            &face_wtc,
                        );
                        if homography.try_inverse().is_none() {
                            debug!("skipping view {} for face {face}: singular homography", view.id);
                            return None;
                        }
                        Some(CompositeOp {
                            view: view.id.clone(),
                            source,
                            homography,
                        })
                    })
                    .collect();
                FacePlan { face, ops }
            })
            .collect()
    }

    /// Execute a plan, producing one buffer per face in face order.
    ///
    /// Buffers stay in the mirrored orientation the source depths were
    /// warped in.
    pub fn apply(&self, plan: &[FacePlan], sources: &[SourceView]) -> Result<Vec<CompositeBuffer>> {
        let mut faces = vec![CompositeBuffer::filled(self.size, self.size, 0); NUM_FACES];
        let mirrored: Vec<EuclideanDepthImage> =
            sources.iter().map(|s| s.depth.flip_horizontal()).collect();

        for face_plan in plan {
            let buffer = &mut faces[face_plan.face.index()];
            for op in &face_plan.ops {
                let src = &mirrored[op.source];
                composite(buffer, src, &op.homography)?;
            }
            debug!(
                "face {}: {} contributing views, {} pixels covered",
                face_plan.face,
                face_plan.ops.len(),
                buffer.count_valid()
            );
        }
        Ok(faces)
    }

    /// Plan and apply in one go.
    pub fn project(&self, sources: &[SourceView]) -> Result<Vec<CompositeBuffer>> {
        let plan = self.plan(sources);
        self.apply(&plan, sources)
    }
}

/// Overwrite `buffer` with the warped depth wherever the view has reliable
/// coverage.
fn composite(buffer: &mut CompositeBuffer, src: &EuclideanDepthImage, h: &Mat3) -> Result<()> {
    let (w, hgt) = buffer.dimensions();
    let warped = warp_perspective_nearest(src, h, w, hgt)?;
    let mut mask = warp_coverage(h, src.width(), src.height(), w, hgt)?;
    for (m, &d) in mask.as_mut_slice().iter_mut().zip(warped.as_slice()) {
        if d == 0.0 {
            *m = 0;
        }
    }
    let mask = erode3x3(&mask);

    for ((out, &m), &d) in buffer
        .as_mut_slice()
        .iter_mut()
        .zip(mask.as_slice())
        .zip(warped.as_slice())
    {
        if m == 1 {
            // Float to integer casts saturate.
            *out = d as u16;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use depth_skybox_core::synthetic::synthetic_panorama;
    use depth_skybox_core::{Vec3, forward_axis, yaw_rotation};

    fn source(id: ViewId, k: PinholeIntrinsics, r: Mat3, depth: f32, size: usize) -> SourceView {
        SourceView {
            id,
            intrinsics: k,
            rotation_ctw: r,
            depth: EuclideanDepthImage::filled(size, size, depth),
        }
    }

    #[test]
    fn plan_follows_source_order_and_skips_faces_behind() {
        let k = PinholeIntrinsics::ideal(32, 32);
        let record = synthetic_panorama("p", k);
        let sources: Vec<SourceView> = record
            .views()
            .iter()
            .map(|v| source(v.id.clone(), k, v.extrinsics.rotation_ctw(), 1.0, 32))
            .collect();
        let projector = SkyboxProjector::new(64, record.reference_rotation_wtc().unwrap());
        let plan = projector.plan(&sources);

        assert_eq!(plan.len(), NUM_FACES);
        for (i, face_plan) in plan.iter().enumerate() {
            assert_eq!(face_plan.face.index(), i);
            assert!(face_plan.ops.windows(2).all(|w| w[0].source < w[1].source));
            let face_axis = projector.face_ctw(face_plan.face) * forward_axis();
            for op in &face_plan.ops {
                let axis = sources[op.source].rotation_ctw * forward_axis();
                assert!(axis.dot(&face_axis) >= 0.0);
            }
        }
        let front = &plan[SkyboxFace::Front.index()];
        assert!(front.ops.iter().any(|op| op.view == ViewId::new("p", 1, 5)));
    }

    #[test]
    fn later_views_overwrite_earlier_ones() {
        let k = PinholeIntrinsics::ideal(16, 16);
        let r = Mat3::identity();
        let sources = vec![
            source(ViewId::new("p", 0, 0), k, r, 100.0, 16),
            source(ViewId::new("p", 0, 1), k, r, 200.0, 16),
        ];
        let projector = SkyboxProjector::new(16, Mat3::identity());
        let faces = projector.project(&sources).unwrap();
        let front = &faces[SkyboxFace::Front.index()];
        assert!(front.as_slice().iter().all(|&v| v == 200));
    }

    #[test]
    fn zero_depth_never_overwrites() {
        let k = PinholeIntrinsics::ideal(16, 16);
        let r = Mat3::identity();
        let mut second = source(ViewId::new("p", 0, 1), k, r, 200.0, 16);
        second.depth.set(8, 8, 0.0);
        let sources = vec![source(ViewId::new("p", 0, 0), k, r, 100.0, 16), second];
        let faces = SkyboxProjector::new(16, Mat3::identity())
            .project(&sources)
            .unwrap();
        let front = &faces[SkyboxFace::Front.index()];
        // The hole is mirrored and widened by erosion; the first view shows
        // through.
        assert_eq!(front.get(7, 8), 100);
        assert_eq!(front.get(6, 7), 100);
        assert_eq!(front.get(0, 0), 200);
    }

    #[test]
    fn saturates_large_depths() {
        let k = PinholeIntrinsics::ideal(8, 8);
        let sources = vec![source(ViewId::new("p", 0, 0), k, Mat3::identity(), 1e9, 8)];
        let faces = SkyboxProjector::new(8, Mat3::identity())
            .project(&sources)
            .unwrap();
        assert_eq!(faces[SkyboxFace::Front.index()].get(4, 4), u16::MAX);
    }

    #[test]
    fn view_facing_away_contributes_nothing() {
        let k = PinholeIntrinsics::ideal(16, 16);
        let back = yaw_rotation(std::f64::consts::PI);
        assert!((back * Vec3::z() + Vec3::z()).norm() < 1e-12);
        let sources = vec![source(ViewId::new("p", 0, 0), k, back, 500.0, 16)];
        let projector = SkyboxProjector::new(16, Mat3::identity());
        let plan = projector.plan(&sources);
        assert!(plan[SkyboxFace::Front.index()].ops.is_empty());
        let faces = projector.apply(&plan, &sources).unwrap();
        assert!(faces[SkyboxFace::Front.index()].as_slice().iter().all(|&v| v == 0));
        assert!(faces[SkyboxFace::Back.index()].count_valid() > 0);
    }
}
