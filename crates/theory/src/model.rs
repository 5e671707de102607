//! Theories, lineage, and the validation/execution/listing result types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TheoryScope {
    Autism,
    Cancer,
    Cardiovascular,
    Neurological,
    Metabolic,
}

impl TheoryScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TheoryScope::Autism => "autism",
            TheoryScope::Cancer => "cancer",
            TheoryScope::Cardiovascular => "cardiovascular",
            TheoryScope::Neurological => "neurological",
            TheoryScope::Metabolic => "metabolic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "autism" => Some(TheoryScope::Autism),
            "cancer" => Some(TheoryScope::Cancer),
            "cardiovascular" => Some(TheoryScope::Cardiovascular),
            "neurological" => Some(TheoryScope::Neurological),
            "metabolic" => Some(TheoryScope::Metabolic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TheoryLifecycle {
    Draft,
    Active,
    Deprecated,
    Archived,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TheoryCriteria {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pathways: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phenotypes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceModel {
    pub priors: f64,
    #[serde(default)]
    pub likelihood_weights: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theory {
    pub id: String,
    pub version: String,
    pub scope: TheoryScope,
    pub title: String,
    pub description: String,
    pub criteria: TheoryCriteria,
    pub evidence_model: EvidenceModel,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lifecycle: TheoryLifecycle,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub has_comments: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoryLineage {
    pub theory_id: String,
    pub version: String,
    pub parent_id: Option<String>,
    pub parent_version: Option<String>,
    pub fork_reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForkResult {
    pub new_theory_id: String,
    pub new_version: String,
    pub parent_id: String,
    pub parent_version: String,
    pub changes_made: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoryCreationResult {
    pub theory_id: String,
    pub version: String,
    pub status: String,
    pub validation_errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub theory_id: String,
    pub theory_version: String,
    pub family_id: String,
    pub gene_hits: usize,
    pub bayes_factor: f64,
    pub posterior: f64,
    pub support_class: evidence::SupportClass,
    pub execution_time_ms: u64,
    pub artifact_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoryStats {
    pub total: usize,
    pub active: usize,
    pub by_scope: HashMap<String, usize>,
    pub average_posterior: f64,
}
