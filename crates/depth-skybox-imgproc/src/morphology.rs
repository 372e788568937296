use depth_skybox_core::Mask;

/// Erode a binary mask once with a 3x3 square.
///
/// Neighbours outside the image are ignored, so the image border alone never
/// erodes a pixel.
pub fn erode3x3(mask: &Mask) -> Mask {
    let (w, h) = mask.dimensions();
    Mask::from_fn(w, h, |x, y| {
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                if mask.get_checked(x as isize + dx, y as isize + dy) == Some(0) {
                    return 0;
                }
            }
        }
        1
    })
}
