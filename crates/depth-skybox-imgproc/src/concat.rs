use depth_skybox_core::Grid;

use crate::ImgprocError;

/// Place images side by side, left to right.
pub fn hconcat<T: Copy>(images: &[Grid<T>]) -> Result<Grid<T>, ImgprocError> {
    let first = images.first().ok_or(ImgprocError::EmptyConcat)?;
    let height = first.height();
    for (index, img) in images.iter().enumerate() {
        if img.height() != height {
            return Err(ImgprocError::HeightMismatch {
                index,
                expected: height,
                actual: img.height(),
            });
        }
    }

    let width: usize = images.iter().map(Grid::width).sum();
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for img in images {
            data.extend_from_slice(img.row(y));
        }
    }
    Ok(Grid::from_vec(width, height, data)?)
}
