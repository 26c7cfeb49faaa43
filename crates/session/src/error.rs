use std::fmt;
use std::path::PathBuf;

use document::RasterIoError;
use view::ViewTransformError;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// A source image or mask is unreadable, malformed or sized wrong.
    Decode {
        path: PathBuf,
        reason: String,
    },
    /// A mask could not be persisted; the previous file is untouched.
    Encode {
        path: PathBuf,
        reason: String,
    },
    InvalidGeometry {
        width: u32,
        height: u32,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    NotLoaded,
    Catalog {
        path: PathBuf,
        reason: String,
    },
    View(ViewTransformError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Decode { path, reason } => {
                write!(f, "cannot load {}: {reason}", path.display())
            }
            SessionError::Encode { path, reason } => {
                write!(f, "cannot save {}: {reason}", path.display())
            }
            SessionError::InvalidGeometry { width, height } => {
                write!(f, "invalid geometry {width}x{height}")
            }
            SessionError::IndexOutOfRange { index, len } => {
                write!(f, "sample index {index} out of range for {len} samples")
            }
            SessionError::NotLoaded => write!(f, "no sample is loaded"),
            SessionError::Catalog { path, reason } => {
                write!(f, "cannot list samples in {}: {reason}", path.display())
            }
            SessionError::View(error) => write!(f, "view error: {error}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<RasterIoError> for SessionError {
    fn from(error: RasterIoError) -> Self {
        match error {
            RasterIoError::Decode { path, reason } => SessionError::Decode { path, reason },
            RasterIoError::Encode { path, reason } => SessionError::Encode { path, reason },
            RasterIoError::InvalidGeometry { width, height } => {
                SessionError::InvalidGeometry { width, height }
            }
            RasterIoError::DimensionMismatch {
                path,
                expected,
                actual,
            } => SessionError::Decode {
                path,
                reason: format!(
                    "mask is {}x{}, image is {}x{}",
                    actual.0, actual.1, expected.0, expected.1
                ),
            },
        }
    }
}

impl From<ViewTransformError> for SessionError {
    fn from(error: ViewTransformError) -> Self {
        SessionError::View(error)
    }
}
