//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while decoding or persisting artifacts.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding failed: {0}")]
    EncodeFailed(String),

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read source stream: {0}")]
    SourceFailed(#[source] std::io::Error),
}

impl MediaError {
    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure came from the stream being copied rather than
    /// the destination file.
    pub fn is_source_error(&self) -> bool {
        matches!(self, MediaError::SourceFailed(_))
    }

    /// Whether the failure came from the payload rather than the filesystem.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            MediaError::MalformedPayload(_) | MediaError::UnsupportedFormat(_)
        )
    }
}
