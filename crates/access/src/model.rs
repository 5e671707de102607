//! Access requests, attempts, and results.

use platform_core::model::{Action, ConsentType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub struct AccessRequest<'a> {
    pub user_id: &'a str,
    pub action: Action,
    pub resource_id: &'a str,
    pub ip_address: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessAttempt {
    pub audit_id: String,
    pub user_id: String,
    pub action: Action,
    pub resource_id: String,
    pub granted: bool,
    pub reason: String,
    pub consent_types_checked: Vec<ConsentType>,
    pub timestamp: String,
    pub ip_address: String,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResult {
    pub audit_id: String,
    pub granted: bool,
    pub reason: String,
    pub consent_types_checked: Vec<ConsentType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessStats {
    pub total_requests: usize,
    pub granted: usize,
    pub denied: usize,
    pub grant_rate: f64,
    pub by_action: Map<String, Value>,
    pub unique_users: usize,
}
