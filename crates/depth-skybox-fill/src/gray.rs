//! Guide image preparation.

use depth_skybox_core::GrayImage;
use depth_skybox_imgproc::resize_bilinear;

use crate::FillError;

/// Luma of an RGB pixel, `0.299 R + 0.587 G + 0.114 B` in 14-bit fixed point.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    ((r as u32 * R + g as u32 * G + b as u32 * B + (1 << 13)) >> 14) as u8
}

/// Grayscale image from an interleaved RGB buffer.
pub fn gray_from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<GrayImage, FillError> {
    let expected = width * height * 3;
    if rgb.len() != expected {
        return Err(FillError::ColorBuffer {
            expected,
            actual: rgb.len(),
        });
    }
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let i = 3 * (y * width + x);
        luma(rgb[i], rgb[i + 1], rgb[i + 2])
    }))
}

/// Bring a guide to the depth image's resolution.
pub fn match_guide(guide: &GrayImage, width: usize, height: usize) -> GrayImage {
    resize_bilinear(guide, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_weights() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn buffer_length_is_checked() {
        assert!(gray_from_rgb(2, 2, &[0; 11]).is_err());
        let g = gray_from_rgb(2, 1, &[255, 0, 0, 0, 0, 255]).unwrap();
        assert_eq!(g.as_slice(), &[76, 29]);
    }
}
