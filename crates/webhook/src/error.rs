//! Error types for the webhook pipeline.

use platform_core::{ErrorKind, PlatformError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("unknown partner: {0}")]
    UnknownPartner(String),

    #[error("partner {0} is inactive")]
    InactivePartner(String),

    #[error("event type {0} not supported by this partner")]
    UnsupportedEvent(String),

    #[error("{0}")]
    Validation(String),

    #[error("handler failed: {0}")]
    HandlerFailed(String),
}

pub type Result<T> = std::result::Result<T, WebhookError>;

impl From<WebhookError> for PlatformError {
    fn from(err: WebhookError) -> Self {
        let kind = match &err {
            WebhookError::UnknownPartner(_) => ErrorKind::NotFound,
            WebhookError::InactivePartner(_) => ErrorKind::Unauthorized,
            WebhookError::UnsupportedEvent(_) => ErrorKind::UnsupportedEvent,
            WebhookError::Validation(_) => ErrorKind::Validation,
            WebhookError::HandlerFailed(_) => ErrorKind::Internal,
        };
        PlatformError::new(kind, err.to_string())
    }
}
