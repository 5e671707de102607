//! Structured validation of evidence payloads, a pre-gate callers may run
//! before `EvidenceAccumulator::add_evidence`.

use serde_json::{Map, Value};

use crate::model::EvidenceValidationResult;

const VALID_EVIDENCE_TYPES: [&str; 3] = ["variant_hit", "segregation", "pathway"];

pub fn validate_evidence(evidence_type: &str, weight: f64, data: &Map<String, Value>) -> EvidenceValidationResult {
    let mut errors = Vec::new();

    if !VALID_EVIDENCE_TYPES.contains(&evidence_type) {
        errors.push(format!(
            "Invalid evidence type. Must be one of: {}",
            VALID_EVIDENCE_TYPES.join(", ")
        ));
    }

    if !(0.0..=10.0).contains(&weight) {
        errors.push("Weight must be a number between 0 and 10".to_string());
    }

    let required_fields: &[&str] = match evidence_type {
        "variant_hit" => &["gene", "variant", "impact"],
        "segregation" => &["family_id", "affected_carriers", "unaffected_carriers"],
        "pathway" => &["pathway_name", "genes_in_pathway"],
        _ => &[],
    };
    for field in required_fields {
        if !data.contains_key(*field) {
            errors.push(format!("{evidence_type} evidence missing required data field: {field}"));
        }
    }

    EvidenceValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variant_hit_requires_gene_variant_impact() {
        let mut data = Map::new();
        data.insert("gene".to_string(), json!("BRCA1"));
        let result = validate_evidence("variant_hit", 5.0, &data);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("variant")));
    }

    #[test]
    fn complete_variant_hit_is_valid() {
        let mut data = Map::new();
        data.insert("gene".to_string(), json!("BRCA1"));
        data.insert("variant".to_string(), json!("c.123A>T"));
        data.insert("impact".to_string(), json!("pathogenic"));
        let result = validate_evidence("variant_hit", 5.0, &data);
        assert!(result.is_valid);
    }

    #[test]
    fn weight_out_of_range_is_invalid() {
        let result = validate_evidence("pathway", 11.0, &Map::new());
        assert!(!result.is_valid);
    }

    #[test]
    fn unknown_evidence_type_is_invalid() {
        let result = validate_evidence("made_up", 1.0, &Map::new());
        assert!(!result.is_valid);
    }
}
