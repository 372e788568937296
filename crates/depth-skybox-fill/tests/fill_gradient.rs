//! End-to-end hole filling on synthetic depth.

use depth_skybox_core::synthetic::Dropout;
use depth_skybox_core::{DepthImage, GrayImage};
use depth_skybox_fill::{CrossBilateralParams, HoleFiller};

fn gradient(width: usize, height: usize) -> DepthImage {
    DepthImage::from_fn(width, height, |x, _| (1000 + 10 * x) as u16)
}

#[test]
fn scattered_holes_are_filled_near_the_truth() {
    let truth = gradient(96, 64);
    let depth = Dropout { seed: 11, rate: 0.2 }.apply(&truth);
    assert!(depth.count_valid() < truth.count_valid());

    let guide = GrayImage::filled(96, 64, 128);
    let filled = HoleFiller::default().fill(&depth, &guide).unwrap();

    assert_eq!(filled.count_valid(), filled.len());
    for (t, f) in truth.as_slice().iter().zip(filled.as_slice()) {
        let rel = (*t as f64 - *f as f64).abs() / *t as f64;
        assert!(rel < 0.08, "{t} -> {f}");
    }
}

#[test]
fn filler_rejects_bad_params() {
    let params = CrossBilateralParams {
        sigma_range: vec![0.2, -1.0, 0.02],
        ..Default::default()
    };
    assert!(HoleFiller::new(params).is_err());
}

#[test]
fn filling_is_deterministic() {
    let depth = Dropout { seed: 5, rate: 0.4 }.apply(&gradient(40, 30));
    let guide = GrayImage::from_fn(40, 30, |x, y| ((x * 13 + y * 7) % 256) as u8);
    let filler = HoleFiller::default();
    assert_eq!(
        filler.fill(&depth, &guide).unwrap(),
        filler.fill(&depth, &guide).unwrap()
    );
}
