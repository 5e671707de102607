//! Theory execution against a VCF dataset.

use evidence::SupportClass;
use genomic_storage::VcfVariant;
use platform_core::{canonical_json, now_rfc3339, sha256_hex};
use serde_json::json;

use crate::model::{ExecutionResult, Theory};
use crate::regions::count_gene_hits;

/// `likelihood = (1 + gene_hits · w_variant_hit) · (1 + |pathways| · w_pathway · 0.1)`.
fn likelihood(theory: &Theory, gene_hits: usize) -> f64 {
    let mut value = 1.0;
    if !theory.criteria.genes.is_empty() {
        let w = theory
            .evidence_model
            .likelihood_weights
            .get("variant_hit")
            .copied()
            .unwrap_or(1.0);
        value *= 1.0 + gene_hits as f64 * w;
    }
    if !theory.criteria.pathways.is_empty() {
        let w = theory
            .evidence_model
            .likelihood_weights
            .get("pathway")
            .copied()
            .unwrap_or(1.0);
        value *= 1.0 + theory.criteria.pathways.len() as f64 * w * 0.1;
    }
    value
}

/// `max(0.001, 0.001 · |variants|)`.
fn null_likelihood(variant_count: usize) -> f64 {
    (0.001 * variant_count as f64).max(0.001)
}

pub fn execute(theory: &Theory, vcf_text: &str, family_id: &str) -> ExecutionResult {
    let started = std::time::Instant::now();
    let variants: Vec<VcfVariant> = genomic_storage::parse_vcf(vcf_text);

    let gene_hits = count_gene_hits(&theory.criteria.genes, &variants);
    let l = likelihood(theory, gene_hits);
    let null_l = null_likelihood(variants.len());
    let bayes_factor = if null_l == 0.0 { 0.0 } else { l / null_l };

    let numerator = theory.evidence_model.priors * bayes_factor;
    let denominator = numerator + (1.0 - theory.evidence_model.priors);
    let posterior = if denominator == 0.0 { 0.0 } else { numerator / denominator };

    let execution_time_ms = (started.elapsed().as_millis() as u64).max(1);

    let artifact_hash = sha256_hex(canonical_json(&json!({
        "theory_id": theory.id,
        "theory_version": theory.version,
        "vcf_hash": sha256_hex(vcf_text),
        "family_id": family_id,
        "timestamp": now_rfc3339(),
    })));

    ExecutionResult {
        theory_id: theory.id.clone(),
        theory_version: theory.version.clone(),
        family_id: family_id.to_string(),
        gene_hits,
        bayes_factor,
        posterior,
        support_class: SupportClass::classify(bayes_factor),
        execution_time_ms,
        artifact_hash,
    }
}
