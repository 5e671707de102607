//! PIA, DPA, and breach record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiaStatus {
    Draft,
    UnderReview,
    Approved,
    Rejected,
    RequiresUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachStatus {
    Reported,
    Investigating,
    Contained,
    Resolved,
    RegulatoryNotified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpaStatus {
    Template,
    Active,
    Expired,
    Terminated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyAssessment {
    pub pia_id: String,
    pub purpose: String,
    pub data_categories: Vec<String>,
    pub processing_activities: Vec<String>,
    pub risk_level: RiskLevel,
    pub status: PiaStatus,
    pub mitigation_measures: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewer: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataProcessingAgreement {
    pub dpa_id: String,
    pub partner_name: String,
    pub purpose: String,
    pub data_categories: Vec<String>,
    pub retention_period: String,
    pub security_measures: Vec<String>,
    pub signed_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub status: DpaStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreachNotification {
    pub breach_id: String,
    pub severity: BreachSeverity,
    pub description: String,
    pub affected_count: u64,
    pub data_categories: Vec<String>,
    pub reported_at: DateTime<Utc>,
    pub status: BreachStatus,
    pub containment_measures: Vec<String>,
    pub notification_deadline: DateTime<Utc>,
    pub regulatory_notified: bool,
    pub affected_notified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceStatus {
    pub compliance_score: f64,
    pub total_pias: usize,
    pub approved_pias: usize,
    pub pending_review_pias: usize,
    pub total_breaches: usize,
    pub resolved_breaches: usize,
    pub overdue_breaches: usize,
    pub total_dpas: usize,
    pub active_dpas: usize,
    pub expiring_soon_dpas: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub status: ComplianceStatus,
    pub high_risk_activities: usize,
    pub critical_breaches: usize,
    pub regulatory_notifications_required: usize,
    pub recommendations: Vec<String>,
    pub next_review_date: DateTime<Utc>,
}
