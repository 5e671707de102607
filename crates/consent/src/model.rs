//! Consent forms and records.

use chrono::{DateTime, Utc};
use platform_core::model::ConsentType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    Active,
    Withdrawn,
    Expired,
    Pending,
}

/// A registered, immutable consent form. Granting one form with N consent
/// types yields N `ConsentRecord`s at capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentForm {
    pub form_id: String,
    pub version: String,
    pub title: String,
    pub description: String,
    pub consent_types: Vec<ConsentType>,
    pub required_fields: Vec<String>,
    pub consent_text: String,
    pub validity_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub consent_id: String,
    pub user_id: String,
    pub consent_type: ConsentType,
    pub status: ConsentStatus,
    pub granted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub withdrawn_at: Option<DateTime<Utc>>,
    pub digital_signature: String,
    pub ip_address: String,
    pub user_agent: String,
    pub consent_text_hash: String,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentStats {
    pub total: usize,
    pub by_status: Map<String, Value>,
    pub by_type: Map<String, Value>,
    pub users_with_active_consent: usize,
}
