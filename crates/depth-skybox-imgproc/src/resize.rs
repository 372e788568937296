//! Image resizing.

use depth_skybox_core::{Grid, GrayImage, Real};

/// Nearest-neighbour resize.
///
/// Destination index `d` reads source index `min(floor(d * src / dst), src - 1)`,
/// so the output only ever holds values present in the input.
pub fn resize_nearest<T: Copy>(src: &Grid<T>, width: usize, height: usize) -> Grid<T> {
    let xs = nearest_indices(src.width(), width);
    let ys = nearest_indices(src.height(), height);
    Grid::from_fn(width, height, |x, y| src.get(xs[x], ys[y]))
}

/// Source index for each destination index along one axis.
pub fn nearest_indices(src_len: usize, dst_len: usize) -> Vec<usize> {
    (0..dst_len)
        .map(|d| (d * src_len / dst_len).min(src_len.saturating_sub(1)))
        .collect()
}

/// Bilinear resize of an 8-bit image with pixel-centre alignment.
pub fn resize_bilinear(src: &GrayImage, width: usize, height: usize) -> GrayImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    if src.is_empty() {
        return GrayImage::filled(width, height, 0);
    }
    let sx = src.width() as Real / width as Real;
    let sy = src.height() as Real / height as Real;
    GrayImage::from_fn(width, height, |x, y| {
        let (x0, x1, fx) = bilinear_taps((x as Real + 0.5) * sx - 0.5, src.width());
        let (y0, y1, fy) = bilinear_taps((y as Real + 0.5) * sy - 0.5, src.height());
        let top = src.get(x0, y0) as Real * (1.0 - fx) + src.get(x1, y0) as Real * fx;
        let bottom = src.get(x0, y1) as Real * (1.0 - fx) + src.get(x1, y1) as Real * fx;
        (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8
    })
}

fn bilinear_taps(s: Real, len: usize) -> (usize, usize, Real) {
    let s = s.clamp(0.0, (len - 1) as Real);
    let lo = s.floor();
    let i0 = lo as usize;
    let i1 = (i0 + 1).min(len - 1);
    (i0, i1, s - lo)
}
