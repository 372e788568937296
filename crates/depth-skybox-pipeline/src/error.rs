use std::path::PathBuf;

use depth_skybox_core::CalibrationError;
use depth_skybox_fill::FillError;
use depth_skybox_imgproc::ImgprocError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a failure, as reported per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Calibration data could not be understood.
    Parse,
    /// An input could not be read or decoded, or an output not written.
    Io,
    /// The run configuration is invalid.
    Config,
    /// An image-processing step rejected its inputs.
    Processing,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Fill(#[from] FillError),
    #[error(transparent)]
    Imgproc(#[from] ImgprocError),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Calibration(e) if e.is_io() => ErrorKind::Io,
            PipelineError::Calibration(_) => ErrorKind::Parse,
            PipelineError::Io { .. } | PipelineError::Image { .. } | PipelineError::Format { .. } => {
                ErrorKind::Io
            }
            PipelineError::Config(_) => ErrorKind::Config,
            PipelineError::Fill(FillError::InvalidParams(_)) => ErrorKind::Config,
            PipelineError::Fill(_) | PipelineError::Imgproc(_) => ErrorKind::Processing,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        PipelineError::Image {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
