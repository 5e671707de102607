//! Anchors, differences, and VCF variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorSequence {
    pub anchor_id: String,
    pub sequence_hash: String,
    pub reference_genome: String,
    pub quality_score: f64,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomicDifference {
    pub diff_id: String,
    pub anchor_id: String,
    pub individual_id: String,
    pub position: u64,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub quality_score: f64,
    pub created_at: DateTime<Utc>,
}

/// A single parsed VCF data line, prior to being stored as a difference.
#[derive(Debug, Clone, PartialEq)]
pub struct VcfVariant {
    pub chromosome: String,
    pub position: u64,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub quality_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomicDataSummary {
    pub individual_id: String,
    pub anchor_id: String,
    pub total_variants: usize,
    pub storage_size_mb: f64,
    pub compression_ratio: f64,
}
