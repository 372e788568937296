//! Dense row-major image grids.
//!
//! Depth images, coverage masks and guide images all share one container,
//! [`Grid`], indexed by `(x, y)` with `x` running along a row.

use thiserror::Error;

/// Sentinel stored in depth grids for "no measurement".
pub const INVALID_DEPTH: u16 = 0;

/// Raw sensor depth (z-distance along the optical axis).
pub type DepthImage = Grid<u16>;
/// True radial distance from the optical centre; `0.0` keeps the invalid sentinel.
pub type EuclideanDepthImage = Grid<f32>;
/// Per-face `u16` accumulator written during compositing.
pub type CompositeBuffer = Grid<u16>;
/// Binary mask, `1` where a pixel is usable.
pub type Mask = Grid<u8>;
/// 8-bit single channel image (grayscale guide, quantized depth).
pub type GrayImage = Grid<u8>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("buffer holds {actual} values, expected {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}

/// A `width x height` image stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Grid filled with `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        if data.len() != width * height {
            return Err(GridError::SizeMismatch {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// Value at signed coordinates, `None` outside the grid.
    #[inline]
    pub fn get_checked(&self, x: isize, y: isize) -> Option<T> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * self.width + x] = value;
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Mirror around the vertical axis (`x -> width - 1 - x`).
    pub fn flip_horizontal(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for y in 0..self.height {
            data.extend(self.row(y).iter().rev().copied());
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl<T: Copy + PartialOrd> Grid<T> {
    /// Largest value, `None` for an empty grid.
    pub fn max_value(&self) -> Option<T> {
        let mut it = self.data.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |m, v| if v > m { v } else { m }))
    }
}

impl Grid<u16> {
    /// Number of pixels holding a measurement.
    pub fn count_valid(&self) -> usize {
        self.data.iter().filter(|&&v| v != INVALID_DEPTH).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Grid::from_vec(3, 2, vec![0u8; 5]).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch {
                width: 3,
                height: 2,
                actual: 5
            }
        );
    }

    #[test]
    fn flip_horizontal_reverses_rows() {
        let g = Grid::from_fn(3, 2, |x, y| (y * 3 + x) as u16);
        let f = g.flip_horizontal();
        assert_eq!(f.row(0), &[2, 1, 0]);
        assert_eq!(f.row(1), &[5, 4, 3]);
        assert_eq!(f.flip_horizontal(), g);
    }

    #[test]
    fn checked_access_outside_is_none() {
        let g = Grid::filled(2, 2, 7u8);
        assert_eq!(g.get_checked(-1, 0), None);
        assert_eq!(g.get_checked(0, 2), None);
        assert_eq!(g.get_checked(1, 1), Some(7));
    }

    #[test]
    fn max_and_valid_count() {
        let g = Grid::from_vec(2, 2, vec![0u16, 9, 3, 0]).unwrap();
        assert_eq!(g.max_value(), Some(9));
        assert_eq!(g.count_valid(), 2);
    }
}
