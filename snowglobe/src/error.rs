use std::io;
use std::path::PathBuf;

use thiserror::Error;

use common::{FileExtensionError, SerdeFormatError};

/// Errors surfaced by calibration and image I/O.
///
/// Configuration errors are recoverable: the model that attempted the load
/// keeps its previous values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to open calibration '{path}': {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Calibration '{path}' is missing field '{field}'")]
    ConfigIncomplete { path: PathBuf, field: &'static str },

    #[error("Failed to parse calibration '{path}': {source}")]
    ConfigMalformed {
        path: PathBuf,
        #[source]
        source: SerdeFormatError,
    },

    #[error("Calibration '{path}' is invalid: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to write calibration '{path}': {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize calibration: {0}")]
    ConfigSerialize(#[source] SerdeFormatError),

    #[error(transparent)]
    Format(#[from] FileExtensionError),

    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image '{path}' is empty")]
    EmptyImage { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for failures that leave a loaded model untouched and let the
    /// session continue with its previous parameters.
    pub fn is_recoverable_config(&self) -> bool {
        matches!(
            self,
            Error::ConfigUnreadable { .. }
                | Error::ConfigIncomplete { .. }
                | Error::ConfigMalformed { .. }
                | Error::ConfigInvalid { .. }
                | Error::Format(_)
        )
    }
}
