//! Error types for the audit ledger.

use platform_core::{ErrorKind, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("entry not found: {0}")]
    EntryNotFound(u64),

    #[error("ledger integrity check failed: {0}")]
    IntegrityViolation(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<LedgerError> for PlatformError {
    fn from(err: LedgerError) -> Self {
        let kind = match &err {
            LedgerError::EntryNotFound(_) => ErrorKind::NotFound,
            LedgerError::IntegrityViolation(_) => ErrorKind::Integrity,
        };
        PlatformError::new(kind, err.to_string())
    }
}
