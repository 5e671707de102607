//! Error types for the theory engine.

use platform_core::{ErrorKind, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TheoryError {
    #[error("theory not found: {0}@{1}")]
    NotFound(String, String),
}

pub type Result<T> = std::result::Result<T, TheoryError>;

impl From<TheoryError> for PlatformError {
    fn from(err: TheoryError) -> Self {
        PlatformError::new(ErrorKind::NotFound, err.to_string())
    }
}
