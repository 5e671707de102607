//! Wire types for partners and webhook events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event types a partner may be registered to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SequencingComplete,
    QcComplete,
    AnalysisComplete,
    UploadComplete,
    ErrorNotification,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::SequencingComplete => "sequencing_complete",
            EventType::QcComplete => "qc_complete",
            EventType::AnalysisComplete => "analysis_complete",
            EventType::UploadComplete => "upload_complete",
            EventType::ErrorNotification => "error_notification",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sequencing_complete" => Some(EventType::SequencingComplete),
            "qc_complete" => Some(EventType::QcComplete),
            "analysis_complete" => Some(EventType::AnalysisComplete),
            "upload_complete" => Some(EventType::UploadComplete),
            "error_notification" => Some(EventType::ErrorNotification),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-event lifecycle. See the crate doc comment for the transition
/// diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Received,
    Processing,
    Completed,
    Failed,
    Retrying,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Received => "received",
            WebhookStatus::Processing => "processing",
            WebhookStatus::Completed => "completed",
            WebhookStatus::Failed => "failed",
            WebhookStatus::Retrying => "retrying",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPartner {
    pub partner_id: String,
    pub name: String,
    pub secret: String,
    pub active: bool,
    pub supported_events: Vec<EventType>,
    pub webhook_url: Option<String>,
    pub timeout_seconds: u32,
    pub max_retries: u32,
}

impl WebhookPartner {
    pub fn supports(&self, event_type: EventType) -> bool {
        self.supported_events.contains(&event_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_id: String,
    pub partner_id: String,
    pub event_type: EventType,
    pub data: Map<String, Value>,
    pub timestamp: String,
    pub status: WebhookStatus,
    pub signature: Option<String>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub next_retry: Option<String>,
    pub error_message: Option<String>,
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookStats {
    pub total_events: usize,
    pub status_distribution: Map<String, Value>,
    pub partner_distribution: Map<String, Value>,
    pub active_partners: usize,
    pub queue_size: usize,
}
