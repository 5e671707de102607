//! Error types for the evidence accumulator.

use platform_core::{ErrorKind, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("invalid evidence: {0}")]
    InvalidEvidence(String),
}

pub type Result<T> = std::result::Result<T, EvidenceError>;

impl From<EvidenceError> for PlatformError {
    fn from(err: EvidenceError) -> Self {
        PlatformError::new(ErrorKind::Validation, err.to_string())
    }
}
