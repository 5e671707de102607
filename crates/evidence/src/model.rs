//! Evidence records and accumulation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub theory_id: String,
    pub theory_version: String,
    pub family_id: String,
    pub bayes_factor: f64,
    pub evidence_type: String,
    pub weight: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportClass {
    Insufficient,
    Weak,
    Moderate,
    Strong,
}

impl SupportClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportClass::Insufficient => "insufficient",
            SupportClass::Weak => "weak",
            SupportClass::Moderate => "moderate",
            SupportClass::Strong => "strong",
        }
    }

    /// Thresholds are inclusive at 1, 3, 10.
    pub fn classify(bayes_factor: f64) -> Self {
        if bayes_factor >= 10.0 {
            SupportClass::Strong
        } else if bayes_factor >= 3.0 {
            SupportClass::Moderate
        } else if bayes_factor >= 1.0 {
            SupportClass::Weak
        } else {
            SupportClass::Insufficient
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccumulationResult {
    pub accumulated_bf: f64,
    pub posterior: f64,
    pub support_class: SupportClass,
    pub evidence_count: usize,
    pub families_analyzed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}
