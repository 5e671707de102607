//! Per-(theory, version) Bayesian evidence accumulation.

pub mod error;
pub mod math;
pub mod model;
pub mod validator;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;

pub use error::{EvidenceError, Result};
pub use model::{AccumulationResult, EvidenceRecord, EvidenceValidationResult, SupportClass};
pub use validator::validate_evidence;

type Key = (String, String);

struct State {
    trails: HashMap<Key, Vec<EvidenceRecord>>,
}

#[derive(Clone)]
pub struct EvidenceAccumulator {
    state: Arc<Mutex<State>>,
}

impl EvidenceAccumulator {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                trails: HashMap::new(),
            })),
        }
    }

    /// Bayes factor must be strictly positive.
    pub fn add_evidence(
        &self,
        theory_id: &str,
        theory_version: &str,
        family_id: &str,
        bayes_factor: f64,
        evidence_type: &str,
        weight: f64,
        source: &str,
    ) -> Result<()> {
        if bayes_factor <= 0.0 {
            return Err(EvidenceError::InvalidEvidence(
                "bayes_factor must be strictly positive".to_string(),
            ));
        }
        let record = EvidenceRecord {
            theory_id: theory_id.to_string(),
            theory_version: theory_version.to_string(),
            family_id: family_id.to_string(),
            bayes_factor,
            evidence_type: evidence_type.to_string(),
            weight,
            timestamp: Utc::now(),
            source: source.to_string(),
        };
        self.state
            .lock()
            .trails
            .entry((theory_id.to_string(), theory_version.to_string()))
            .or_default()
            .push(record);
        tracing::debug!(theory_id, theory_version, family_id, bayes_factor, "evidence added");
        Ok(())
    }

    pub fn evidence_trail(&self, theory_id: &str, theory_version: &str) -> Vec<EvidenceRecord> {
        self.state
            .lock()
            .trails
            .get(&(theory_id.to_string(), theory_version.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn update_posterior(&self, theory_id: &str, theory_version: &str, prior: f64) -> AccumulationResult {
        let trail = self.evidence_trail(theory_id, theory_version);
        let n = trail.len();
        if n == 0 {
            return AccumulationResult {
                accumulated_bf: 1.0,
                posterior: prior,
                support_class: SupportClass::Insufficient,
                evidence_count: 0,
                families_analyzed: 0,
            };
        }

        let s = math::shrinkage(n);
        let accumulated_bf: f64 = trail
            .iter()
            .map(|r| math::weighted_bf(r.bayes_factor, r.weight, s))
            .product();
        let posterior = math::posterior(prior, accumulated_bf);
        let families_analyzed: HashSet<&str> = trail.iter().map(|r| r.family_id.as_str()).collect();

        AccumulationResult {
            accumulated_bf,
            posterior,
            support_class: SupportClass::classify(accumulated_bf),
            evidence_count: n,
            families_analyzed: families_analyzed.len(),
        }
    }
}

impl Default for EvidenceAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_evidence_rejects_non_positive_bf() {
        let acc = EvidenceAccumulator::new();
        let err = acc
            .add_evidence("T", "1.0.0", "fam1", 0.0, "variant_hit", 1.0, "test")
            .unwrap_err();
        assert!(matches!(err, EvidenceError::InvalidEvidence(_)));
    }

    #[test]
    fn empty_trail_yields_posterior_equal_to_prior() {
        let acc = EvidenceAccumulator::new();
        let result = acc.update_posterior("T", "1.0.0", 0.1);
        assert_eq!(result.accumulated_bf, 1.0);
        assert_eq!(result.posterior, 0.1);
        assert_eq!(result.support_class, SupportClass::Insufficient);
        assert_eq!(result.evidence_count, 0);
    }

    #[test]
    fn s4_evidence_accumulation_scenario() {
        let acc = EvidenceAccumulator::new();
        acc.add_evidence("T", "1.0.0", "fam1", 2.0, "variant_hit", 1.0, "test")
            .unwrap();
        acc.add_evidence("T", "1.0.0", "fam2", 3.0, "variant_hit", 1.0, "test")
            .unwrap();

        let result = acc.update_posterior("T", "1.0.0", 0.1);
        assert!((result.accumulated_bf - 3.52).abs() < 1e-9);
        assert!((result.posterior - 0.2811).abs() < 1e-3);
        assert_eq!(result.support_class, SupportClass::Moderate);
        assert_eq!(result.families_analyzed, 2);
        assert_eq!(result.evidence_count, 2);
    }

    #[test]
    fn support_class_thresholds_are_inclusive() {
        assert_eq!(SupportClass::classify(1.0), SupportClass::Weak);
        assert_eq!(SupportClass::classify(3.0), SupportClass::Moderate);
        assert_eq!(SupportClass::classify(10.0), SupportClass::Strong);
        assert_eq!(SupportClass::classify(0.5), SupportClass::Insufficient);
    }
}
