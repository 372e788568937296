//! Single-view projection scenarios with known geometry.

use depth_skybox_core::synthetic::plane_depth;
use depth_skybox_core::{Mat3, PinholeIntrinsics, Pt2, SkyboxFace, ViewId, yaw_rotation};
use depth_skybox_imgproc::{apply_homography, z_to_euclidean};
use depth_skybox_pipeline::{SkyboxProjector, SourceView, downsample_face};

const SIZE: usize = 640;
const FACE: usize = 512;
const PLANE_Z: u16 = 2000;

fn plane_view(rotation_ctw: Mat3) -> SourceView {
    let k = PinholeIntrinsics::new(320.0, 320.0, 320.0, 320.0);
    SourceView {
        id: ViewId::new("scenario", 1, 5),
        intrinsics: k,
        rotation_ctw,
        depth: z_to_euclidean(&plane_depth(SIZE, SIZE, PLANE_Z), &k),
    }
}

#[test]
fn scenario_a_plane_lands_inside_its_footprint() {
    let view = plane_view(yaw_rotation(0.5));
    let projector = SkyboxProjector::new(FACE, Mat3::identity());
    let plan = projector.plan(std::slice::from_ref(&view));
    let front = &plan[SkyboxFace::Front.index()];
    assert_eq!(front.ops.len(), 1);
    let h_inv = front.ops[0].homography.try_inverse().unwrap();

    let faces = projector.apply(&plan, std::slice::from_ref(&view)).unwrap();
    let composite = &faces[SkyboxFace::Front.index()];

    let mut inside = 0;
    for y in 0..FACE {
        for x in 0..FACE {
            let v = composite.get(x, y);
            let src = apply_homography(&h_inv, &Pt2::new(x as f64, y as f64));
            let in_footprint = src.is_some_and(|s| {
                s.x >= -0.5 && s.y >= -0.5 && s.x < SIZE as f64 && s.y < SIZE as f64
            });
            if v == 0 {
                continue;
            }
            assert!(in_footprint, "({x}, {y}) = {v} outside the footprint");
            inside += 1;

            // The composite holds the mirrored source; undo that to find the
            // pixel the value came from.
            let s = src.unwrap();
            let ray = view
                .intrinsics
                .pixel_ray((SIZE - 1) as f64 - s.x.round(), s.y.round());
            let expected = PLANE_Z as f64 * ray.norm();
            let rel = (v as f64 - expected).abs() / expected;
            assert!(rel < 0.02, "({x}, {y}) = {v}, expected {expected}");
        }
    }
    assert!(inside > FACE * FACE / 4, "only {inside} pixels covered");
    assert!(inside < FACE * FACE, "footprint should not cover the whole face");
}

#[test]
fn scenario_a_untouched_faces_stay_zero() {
    let view = plane_view(Mat3::identity());
    let faces = SkyboxProjector::new(FACE, Mat3::identity())
        .project(std::slice::from_ref(&view))
        .unwrap();
    // A 90 degree view aligned with the front face covers it and touches
    // none of the other faces' interiors.
    assert!(faces[SkyboxFace::Front.index()].count_valid() > FACE * FACE * 9 / 10);
    let back = &faces[SkyboxFace::Back.index()];
    assert_eq!(back.count_valid(), 0);
    for face in [SkyboxFace::Top, SkyboxFace::Right, SkyboxFace::Left, SkyboxFace::Bottom] {
        let buf = &faces[face.index()];
        for y in 8..FACE - 8 {
            for x in 8..FACE - 8 {
                assert_eq!(buf.get(x, y), 0, "{face} ({x}, {y})");
            }
        }
    }
}

#[test]
fn scenario_b_opposite_view_contributes_nothing() {
    let view = plane_view(yaw_rotation(std::f64::consts::PI));
    let projector = SkyboxProjector::new(FACE, Mat3::identity());
    let plan = projector.plan(std::slice::from_ref(&view));
    assert!(plan[SkyboxFace::Front.index()].ops.is_empty());
    let faces = projector.apply(&plan, std::slice::from_ref(&view)).unwrap();
    assert_eq!(faces[SkyboxFace::Front.index()].count_valid(), 0);
    assert!(faces[SkyboxFace::Back.index()].count_valid() > 0);
}

#[test]
fn downsampled_values_come_from_the_composite() {
    let view = plane_view(yaw_rotation(-0.3));
    let faces = SkyboxProjector::new(FACE, Mat3::identity())
        .project(std::slice::from_ref(&view))
        .unwrap();
    let composite = &faces[SkyboxFace::Front.index()];
    let mut values: Vec<u16> = composite.as_slice().to_vec();
    values.sort_unstable();
    values.dedup();
    for size in [512, 256, 200, 97] {
        let small = downsample_face(composite, size);
        assert!(
            small
                .as_slice()
                .iter()
                .all(|v| values.binary_search(v).is_ok())
        );
    }
}
