//! Error types for the upload coordinator.

use platform_core::{ErrorKind, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("invalid extension for {0}: {1}")]
    InvalidExtension(String, String),

    #[error("file too large for {file_type}: max {max_mb}MB")]
    FileTooLarge { file_type: String, max_mb: u64 },

    #[error("upload not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, UploadError>;

impl From<UploadError> for PlatformError {
    fn from(err: UploadError) -> Self {
        let kind = match &err {
            UploadError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        };
        PlatformError::new(kind, err.to_string())
    }
}
