//! Whole-scan jobs.

use depth_skybox_core::CameraParameters;
use depth_skybox_fill::HoleFiller;
use log::info;

use crate::io::{load_depth, load_guide, save_depth_png};
use crate::{
    DatasetLayout, DebugRenderer, NoopObserver, PanoramaObserver, Result, SkyboxConfig,
    process_panorama,
};

/// Write the depth skybox of every panorama in a scan.
///
/// Returns the number of panoramas written. The first failing panorama
/// aborts the scan.
pub fn process_scan(layout: &DatasetLayout, scan: &str, config: &SkyboxConfig) -> Result<usize> {
    let params = CameraParameters::load(&layout.calibration(scan))?;
    let panos = params.panorama_ids();
    info!("Processing scan {scan} with {} panoramas", panos.len());

    let filler = if config.fill_holes {
        Some(HoleFiller::new(config.filter.clone())?)
    } else {
        None
    };
    let mut renderer;
    let mut noop = NoopObserver;
    let observer: &mut dyn PanoramaObserver = if config.visualize {
        renderer = DebugRenderer::new(layout.clone(), scan);
        &mut renderer
    } else {
        &mut noop
    };

    for pano in &panos {
        let record = params.panorama(pano)?;
        process_panorama(layout, scan, &record, config, filler.as_ref(), observer)?;
    }
    info!("Completed scan {scan}");
    Ok(panos.len())
}

/// Fill holes in every source depth view of a scan, guided by the view's
/// color image.
///
/// Returns the number of filled views written.
pub fn fill_scan_views(layout: &DatasetLayout, scan: &str, filler: &HoleFiller) -> Result<usize> {
    let params = CameraParameters::load(&layout.calibration(scan))?;
    let panos = params.panorama_ids();
    info!("Filling views of scan {scan} with {} panoramas", panos.len());

    let mut written = 0;
    for pano in &panos {
        let record = params.panorama(pano)?;
        for view in record.views() {
            let depth = load_depth(&layout.depth_image(scan, &view.id))?;
            let guide = load_guide(&layout.color_image(scan, &view.id))?;
            let filled = filler.fill(&depth, &guide)?;
            save_depth_png(&layout.filled_depth_image(scan, &view.id), &filled)?;
            written += 1;
        }
    }
    info!("Completed scan {scan}: {written} views filled");
    Ok(written)
}
