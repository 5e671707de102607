//! Theory structure validation, run before storage. Returns a list of
//! human-readable errors rather than failing fast, so callers can surface
//! every problem at once.

use crate::model::{EvidenceModel, Theory, TheoryCriteria};

/// `^\d+\.\d+\.\d+$`, hand-rolled rather than pulling in `regex` for one
/// check.
pub fn is_valid_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

pub fn validate_criteria(criteria: &TheoryCriteria) -> Option<String> {
    if criteria.genes.is_empty() && criteria.pathways.is_empty() && criteria.phenotypes.is_empty() {
        Some("Criteria must contain at least one of: genes, pathways, phenotypes".to_string())
    } else {
        None
    }
}

pub fn validate_evidence_model(model: &EvidenceModel) -> Vec<String> {
    let mut errors = Vec::new();
    if !(0.0..=1.0).contains(&model.priors) {
        errors.push("Priors must be between 0 and 1".to_string());
    }
    errors
}

/// Full structural validation of an already-constructed `Theory` (version
/// and scope are enforced by their own types at parse time, so only the
/// remaining checks are repeated here).
pub fn validate_theory(theory: &Theory) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_semver(&theory.version) {
        errors.push("Version must be in semantic version format (e.g., 1.0.0)".to_string());
    }
    errors.extend(validate_evidence_model(&theory.evidence_model));
    if let Some(err) = validate_criteria(&theory.criteria) {
        errors.push(err);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semver_accepts_standard_form() {
        assert!(is_valid_semver("1.0.0"));
        assert!(is_valid_semver("12.34.56"));
    }

    #[test]
    fn semver_rejects_malformed_input() {
        assert!(!is_valid_semver("1.0"));
        assert!(!is_valid_semver("1.0.0-beta"));
        assert!(!is_valid_semver("v1.0.0"));
    }

    #[test]
    fn criteria_requires_at_least_one_nonempty_field() {
        let empty = TheoryCriteria::default();
        assert!(validate_criteria(&empty).is_some());
        let with_genes = TheoryCriteria {
            genes: vec!["BRCA1".to_string()],
            ..Default::default()
        };
        assert!(validate_criteria(&with_genes).is_none());
    }
}
