//! Project a synthetic sphere seen by the rig onto skybox faces.

use depth_skybox_core::synthetic::{sphere_depth, synthetic_panorama};
use depth_skybox_core::{PinholeIntrinsics, SkyboxFace};
use depth_skybox_imgproc::{
    erode3x3, faces_toward, rotation_homography, warp_coverage, warp_perspective_nearest,
    z_to_euclidean,
};

const RADIUS: f64 = 3000.0;

#[test]
fn sphere_depth_is_constant_on_every_facing_face() {
    let k = PinholeIntrinsics::new(48.0, 48.0, 48.0, 40.0);
    let record = synthetic_panorama("sphere", k);
    let reference_wtc = record.reference_rotation_wtc().unwrap();
    let reference_ctw = reference_wtc.transpose();
    let face_size = 64;
    let k_face = SkyboxFace::intrinsics(face_size);
    let depth = z_to_euclidean(&sphere_depth(&k, 96, 80, RADIUS), &k);

    let mut contributions = 0;
    for face in SkyboxFace::ALL {
        let face_ctw = reference_ctw * face.rotation();
        let face_wtc = face.world_to_face(&reference_wtc);
        for view in record.views() {
            let src_ctw = view.extrinsics.rotation_ctw();
            if !faces_toward(&src_ctw, &face_ctw) {
                continue;
            }
            let h = rotation_homography(&view.intrinsics, &src_ctw, &k_face, &face_wtc);
            let warped = warp_perspective_nearest(&depth, &h, face_size, face_size).unwrap();
            let mask = warp_coverage(&h, depth.width(), depth.height(), face_size, face_size)
                .unwrap();
            let mask = erode3x3(&mask);
            for (m, v) in mask.as_slice().iter().zip(warped.as_slice()) {
                if *m == 1 {
                    contributions += 1;
                    let rel = (*v as f64 - RADIUS).abs() / RADIUS;
                    assert!(rel < 0.01, "face {face} view {}: {v}", view.id);
                }
            }
        }
    }
    assert!(contributions > 0);
}

#[test]
fn reference_view_lands_centred_on_front_face() {
    let k = PinholeIntrinsics::ideal(64, 64);
    let record = synthetic_panorama("p", k);
    let reference_wtc = record.reference_rotation_wtc().unwrap();
    let view = record.view(1, 5).unwrap();
    let h = rotation_homography(
        &view.intrinsics,
        &view.extrinsics.rotation_ctw(),
        &SkyboxFace::intrinsics(64),
        &SkyboxFace::Front.world_to_face(&reference_wtc),
    );
    let mask = warp_coverage(&h, 64, 64, 64, 64).unwrap();
    assert!(mask.as_slice().iter().all(|&m| m == 1));
}
