use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FillError {
    #[error("invalid filter parameters: {0}")]
    InvalidParams(String),
    #[error("{what} is {actual_w}x{actual_h}, expected {width}x{height}")]
    SizeMismatch {
        what: &'static str,
        width: usize,
        height: usize,
        actual_w: usize,
        actual_h: usize,
    },
    #[error("color buffer holds {actual} bytes, expected {expected}")]
    ColorBuffer { expected: usize, actual: usize },
}
