//! Error types for anchor+diff storage.

use platform_core::{ErrorKind, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("anchor not found: {0}")]
    AnchorNotFound(String),

    #[error("invalid VCF line: {0}")]
    InvalidVcfLine(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl From<StorageError> for PlatformError {
    fn from(err: StorageError) -> Self {
        let kind = match &err {
            StorageError::AnchorNotFound(_) => ErrorKind::NotFound,
            StorageError::InvalidVcfLine(_) => ErrorKind::Validation,
        };
        PlatformError::new(kind, err.to_string())
    }
}
