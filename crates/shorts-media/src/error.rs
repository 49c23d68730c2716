//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while fetching sources or rendering thumbnails.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Download timed out after {0} seconds")]
    Timeout(u64),

    #[error("Resource limit exceeded: {0}")]
    ResourceLimit(String),

    #[error("Invalid font: {0}")]
    InvalidFont(String),

    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for MediaError {
    fn from(e: image::ImageError) -> Self {
        Self::ImageEncoding(e.to_string())
    }
}
