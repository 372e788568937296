//! Synthetic rigs and scenes.

use crate::{
    CameraExtrinsics, DepthImage, ImageKind, NUM_ANGLES, NUM_STACKS, PanoramaRecord,
    PinholeIntrinsics, Real, RigView, Vec3, ViewId, pitch_rotation, rigid_transform,
    yaw_rotation,
};

/// Tilt of each camera stack in radians.
pub const STACK_PITCH: [Real; NUM_STACKS as usize] = [
    -std::f64::consts::FRAC_PI_4,
    0.0,
    std::f64::consts::FRAC_PI_4,
];

/// Camera-to-world pose of a synthetic rig view: yaw in 60 degree steps,
/// pitch per stack, shared optical centre at `centre`.
pub fn synthetic_pose(stack: u8, angle: u8, centre: &Vec3) -> CameraExtrinsics {
    let yaw = angle as Real * std::f64::consts::TAU / NUM_ANGLES as Real;
    let r = yaw_rotation(yaw) * pitch_rotation(STACK_PITCH[stack as usize]);
    CameraExtrinsics {
        camera_to_world: rigid_transform(&r, centre),
        world_to_camera: rigid_transform(&r.transpose(), &(-(r.transpose() * centre))),
    }
}

/// A complete 18-view panorama sharing one set of intrinsics.
pub fn synthetic_panorama(pano: &str, intrinsics: PinholeIntrinsics) -> PanoramaRecord {
    let centre = Vec3::new(2.0, 1.5, -3.0);
    let views = ViewId::rig_order(pano)
        .map(|id| RigView {
            intrinsics,
            extrinsics: synthetic_pose(id.stack, id.angle, &centre),
            id,
        })
        .collect();
    PanoramaRecord::new(pano.to_string(), views)
}

/// Render panorama records as calibration file text.
pub fn calibration_text(records: &[PanoramaRecord]) -> String {
    let mut out = String::from("dataset synthetic\n");
    out.push_str(&format!("n_images {}\n\n", records.len() * crate::VIEWS_PER_PANORAMA));
    for record in records {
        for stack in 0..NUM_STACKS {
            let views: Vec<&RigView> = record
                .views()
                .iter()
                .filter(|v| v.id.stack == stack)
                .collect();
            let Some(first) = views.first() else {
                continue;
            };
            let k = first.intrinsics;
            out.push_str(&format!(
                "intrinsics_matrix {} 0 {} 0 {} {} 0 0 1\n",
                k.fx, k.cx, k.fy, k.cy
            ));
            for view in views {
                let values: Vec<String> = view
                    .extrinsics
                    .camera_to_world
                    .transpose()
                    .iter()
                    .map(|v| format!("{v:?}"))
                    .collect();
                out.push_str(&format!(
                    "scan {} {} {}\n",
                    view.id.file_name(ImageKind::Depth),
                    view.id.file_name(ImageKind::Color),
                    values.join(" ")
                ));
            }
        }
    }
    out
}

/// Z-depth image of a fronto-parallel plane at distance `z`.
pub fn plane_depth(width: usize, height: usize, z: u16) -> DepthImage {
    DepthImage::filled(width, height, z)
}

/// Z-depth image of a sphere of radius `radius` centred on the camera, so
/// that every pixel's radial distance equals `radius`.
pub fn sphere_depth(
    intrinsics: &PinholeIntrinsics,
    width: usize,
    height: usize,
    radius: Real,
) -> DepthImage {
    DepthImage::from_fn(width, height, |x, y| {
        let ray = intrinsics.pixel_ray(x as Real, y as Real);
        (radius / ray.norm()).round() as u16
    })
}
