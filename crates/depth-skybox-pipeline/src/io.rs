//! Image decoding and atomic PNG output.

use std::io::{BufWriter, Write};
use std::path::Path;

use depth_skybox_core::{DepthImage, GrayImage, Grid};
use depth_skybox_fill::gray_from_rgb;
use image::codecs::png::PngEncoder;
use image::{
    DynamicImage, EncodableLayout, ImageBuffer, ImageReader, Luma, Pixel, PixelWithColorType, Rgb,
};
use tempfile::NamedTempFile;

use crate::{PipelineError, Result};

fn decode(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .map_err(|e| PipelineError::io(path, e))?
        .with_guessed_format()
        .map_err(|e| PipelineError::io(path, e))?
        .decode()
        .map_err(|e| PipelineError::image(path, e))
}

/// Load a single-channel 16-bit depth image.
pub fn load_depth(path: &Path) -> Result<DepthImage> {
    match decode(path)? {
        DynamicImage::ImageLuma16(buf) => {
            let (w, h) = buf.dimensions();
            Ok(Grid::from_vec(w as usize, h as usize, buf.into_raw()).map_err(|e| {
                PipelineError::Format {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?)
        }
        other => Err(PipelineError::Format {
            path: path.to_path_buf(),
            reason: format!(
                "expected a single-channel 16-bit depth image, found {:?}",
                other.color()
            ),
        }),
    }
}

/// Load a color image as a grayscale guide.
pub fn load_guide(path: &Path) -> Result<GrayImage> {
    let rgb = decode(path)?.to_rgb8();
    let (w, h) = rgb.dimensions();
    Ok(gray_from_rgb(w as usize, h as usize, rgb.as_raw())?)
}

/// Write a 16-bit grayscale PNG atomically.
pub fn save_depth_png(path: &Path, depth: &DepthImage) -> Result<()> {
    let buf: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(
        depth.width() as u32,
        depth.height() as u32,
        depth.as_slice().to_vec(),
    )
    .ok_or_else(|| PipelineError::Format {
        path: path.to_path_buf(),
        reason: "depth buffer does not match its dimensions".to_string(),
    })?;
    persist_png(path, &buf)
}

/// Write an interleaved 8-bit RGB PNG atomically.
pub fn save_rgb_png(path: &Path, width: usize, height: usize, rgb: Vec<u8>) -> Result<()> {
    let buf: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(width as u32, height as u32, rgb)
        .ok_or_else(|| PipelineError::Format {
            path: path.to_path_buf(),
            reason: "rgb buffer does not match its dimensions".to_string(),
        })?;
    persist_png(path, &buf)
}

/// Encode into a temporary file next to `path`, then rename it into place.
///
/// Readers never observe a partially written file, and a failure leaves no
/// file at `path`.
fn persist_png<P>(path: &Path, img: &ImageBuffer<P, Vec<P::Subpixel>>) -> Result<()>
where
    P: Pixel + PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        img.write_with_encoder(PngEncoder::new(&mut writer))
            .map_err(|e| PipelineError::image(path, e))?;
        writer.flush().map_err(|e| PipelineError::io(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| PipelineError::io(path, e.error))?;
    Ok(())
}
