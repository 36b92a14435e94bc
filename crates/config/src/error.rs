use std::path::PathBuf;

use thiserror::Error;

use crate::calibration::BrushSize;

/// Errors raised while reading or writing calibration files
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("calibration file {} not found; run the calibration step first", path.display())]
    Missing { path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed calibration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("palette key '{0}' is not one of the reference colors")]
    UnknownColorKey(String),

    #[error("unknown brush key '{0}' (expected brush_1 .. brush_5)")]
    UnknownBrushKey(String),

    #[error("brush {0:?} has no calibrated position")]
    MissingBrush(BrushSize),
}

impl CalibrationError {
    /// True when the file simply has not been calibrated yet
    pub fn is_missing(&self) -> bool {
        matches!(self, CalibrationError::Missing { .. })
    }
}
