use depth_skybox_core::GridError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ImgprocError {
    #[error("homography is not invertible")]
    SingularHomography,
    #[error("cannot concatenate an empty list of images")]
    EmptyConcat,
    #[error("image {index} has height {actual}, expected {expected}")]
    HeightMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
}
