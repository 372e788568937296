//! Per-panorama skybox assembly.

use std::path::PathBuf;

use depth_skybox_core::{
    CalibrationError, CompositeBuffer, DepthImage, GrayImage, NUM_FACES, PanoramaRecord,
    SkyboxFace,
};
use depth_skybox_fill::HoleFiller;
use depth_skybox_imgproc::{hconcat, resize_nearest, z_to_euclidean};
use log::{debug, info};

use crate::io::{load_depth, load_guide, save_depth_png};
use crate::{DatasetLayout, PipelineError, Result, SkyboxConfig, SkyboxProjector, SourceView};

/// Receives intermediate face buffers while a panorama is processed.
///
/// Observers only look; the buffers they see are the ones that end up in
/// the artifact.
pub trait PanoramaObserver {
    /// Composite of a face at working resolution, before downsampling.
    fn raw_face(&mut self, _pano: &str, _face: SkyboxFace, _composite: &CompositeBuffer) {}

    /// Face exactly as stored in the artifact.
    fn finished_face(&mut self, _pano: &str, _face: SkyboxFace, _depth: &DepthImage) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PanoramaObserver for NoopObserver {}

/// Everything read from disk for one panorama.
#[derive(Debug, Clone)]
pub struct PanoramaInputs {
    /// Raw depth per view, in the record's rig order.
    pub depths: Vec<DepthImage>,
    /// Grayscale color skybox faces in face order, present when filling.
    pub guides: Option<Vec<GrayImage>>,
}

impl PanoramaInputs {
    pub fn load(
        layout: &DatasetLayout,
        scan: &str,
        record: &PanoramaRecord,
        load_guides: bool,
    ) -> Result<Self> {
        let depths = record
            .views()
            .iter()
            .map(|v| load_depth(&layout.depth_image(scan, &v.id)))
            .collect::<Result<Vec<_>>>()?;
        let guides = if load_guides {
            Some(
                SkyboxFace::ALL
                    .iter()
                    .map(|&f| load_guide(&layout.color_skybox(scan, record.pano(), f)))
                    .collect::<Result<Vec<_>>>()?,
            )
        } else {
            None
        };
        Ok(Self { depths, guides })
    }
}

/// Linearize each view's depth and pair it with its calibration.
pub fn source_views(record: &PanoramaRecord, depths: Vec<DepthImage>) -> Vec<SourceView> {
    record
        .views()
        .iter()
        .zip(depths)
        .map(|(view, depth)| SourceView {
            id: view.id.clone(),
            intrinsics: view.intrinsics,
            rotation_ctw: view.extrinsics.rotation_ctw(),
            depth: z_to_euclidean(&depth, &view.intrinsics),
        })
        .collect()
}

/// Undo the working mirror and resize to `size x size` without interpolation.
pub fn downsample_face(composite: &CompositeBuffer, size: usize) -> DepthImage {
    resize_nearest(&composite.flip_horizontal(), size, size)
}

/// Build the depth skybox of one panorama: six faces side by side.
pub fn build_skybox(
    record: &PanoramaRecord,
    inputs: PanoramaInputs,
    config: &SkyboxConfig,
    filler: Option<&HoleFiller>,
    observer: &mut dyn PanoramaObserver,
) -> Result<DepthImage> {
    if inputs.depths.len() != record.views().len() {
        return Err(PipelineError::Config(format!(
            "panorama {} has {} views but {} depth images",
            record.pano(),
            record.views().len(),
            inputs.depths.len()
        )));
    }
    let sources = source_views(record, inputs.depths);
    let reference_wtc = record
        .reference_rotation_wtc()
        .ok_or_else(|| CalibrationError::MissingView(record.reference_view_id()))?;
    let projector = SkyboxProjector::new(config.skybox_size, reference_wtc);
    let composites = projector.project(&sources)?;

    let mut faces = Vec::with_capacity(NUM_FACES);
    for (face, composite) in SkyboxFace::ALL.into_iter().zip(&composites) {
        observer.raw_face(record.pano(), face, composite);
        let small = downsample_face(composite, config.output_size);
        let out = match (filler, &inputs.guides) {
            (Some(filler), Some(guides)) => filler.fill(&small, &guides[face.index()])?,
            _ => small,
        };
        debug!(
            "panorama {} face {face}: {} of {} pixels valid",
            record.pano(),
            out.count_valid(),
            out.len()
        );
        observer.finished_face(record.pano(), face, &out);
        faces.push(out);
    }
    Ok(hconcat(&faces)?)
}

/// Load, assemble and store the depth skybox of one panorama.
pub fn process_panorama(
    layout: &DatasetLayout,
    scan: &str,
    record: &PanoramaRecord,
    config: &SkyboxConfig,
    filler: Option<&HoleFiller>,
    observer: &mut dyn PanoramaObserver,
) -> Result<PathBuf> {
    let inputs = PanoramaInputs::load(layout, scan, record, filler.is_some())?;
    let skybox = build_skybox(record, inputs, config, filler, observer)?;
    let path = layout.depth_skybox(scan, record.pano());
    save_depth_png(&path, &skybox)?;
    info!("wrote {}", path.display());
    Ok(path)
}
