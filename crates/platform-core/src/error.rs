//! Cross-cutting error taxonomy.
//!
//! Each component crate defines its own `thiserror` enum for the failures
//! specific to that component, and converts into `PlatformError` at the
//! boundary the composition root sees. An HTTP adapter (outside this
//! workspace) maps `ErrorKind` to a status code.

use std::collections::HashSet;
use thiserror::Error;

use crate::model::ConsentType;

/// The error-kind taxonomy every component failure maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// Missing theory/form/anchor/event/etc.
    NotFound,
    /// Access denied by consent.
    Forbidden,
    /// Duplicate or inconsistent state.
    Conflict,
    /// Invalid HMAC or session.
    Unauthorized,
    /// Webhook event_type not in partner's supported set.
    UnsupportedEvent,
    /// Ledger verification failed.
    Integrity,
    /// Anything unexpected.
    Internal,
}

/// A typed failure crossing a component boundary.
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct PlatformError {
    pub kind: ErrorKind,
    pub message: String,
    /// Present on `Forbidden` errors so the caller can report the decision.
    pub missing_consents: Vec<ConsentType>,
    /// Correlation id, when the failure originated from an access check.
    pub audit_id: Option<String>,
}

impl PlatformError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            missing_consents: Vec::new(),
            audit_id: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn unsupported_event(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedEvent, message)
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Integrity, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn forbidden(message: impl Into<String>, missing: HashSet<ConsentType>, audit_id: String) -> Self {
        Self {
            kind: ErrorKind::Forbidden,
            message: message.into(),
            missing_consents: missing.into_iter().collect(),
            audit_id: Some(audit_id),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
