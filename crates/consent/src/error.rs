//! Error types for the consent store.

use platform_core::{ErrorKind, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsentError {
    #[error("consent form not found: {0}")]
    FormNotFound(String),

    #[error("consent form already registered: {0}")]
    FormAlreadyRegistered(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

pub type Result<T> = std::result::Result<T, ConsentError>;

impl From<ConsentError> for PlatformError {
    fn from(err: ConsentError) -> Self {
        let kind = match &err {
            ConsentError::FormNotFound(_) => ErrorKind::NotFound,
            ConsentError::FormAlreadyRegistered(_) => ErrorKind::Conflict,
            ConsentError::MissingField(_) => ErrorKind::Validation,
        };
        PlatformError::new(kind, err.to_string())
    }
}
