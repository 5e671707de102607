//! Starter theory bodies for `POST /theories` callers, not required by any
//! invariant.

use std::collections::HashMap;

use crate::model::{EvidenceModel, Theory, TheoryCriteria, TheoryLifecycle, TheoryScope};

pub fn template(scope: &str) -> Theory {
    let now = chrono::Utc::now();
    match scope {
        "cancer" => Theory {
            id: String::new(),
            version: "1.0.0".to_string(),
            scope: TheoryScope::Cancer,
            title: "New Cancer Theory".to_string(),
            description: "Description of the theory".to_string(),
            criteria: TheoryCriteria {
                genes: vec!["BRCA1".to_string()],
                pathways: vec!["dna_repair".to_string()],
                phenotypes: vec!["breast_cancer".to_string()],
            },
            evidence_model: EvidenceModel {
                priors: 0.05,
                likelihood_weights: HashMap::from([
                    ("variant_hit".to_string(), 3.0),
                    ("segregation".to_string(), 2.0),
                    ("pathway".to_string(), 1.5),
                ]),
            },
            author: "anonymous".to_string(),
            created_at: now,
            updated_at: now,
            lifecycle: TheoryLifecycle::Draft,
            tags: vec!["draft".to_string(), "new".to_string()],
            has_comments: false,
        },
        _ => Theory {
            id: String::new(),
            version: "1.0.0".to_string(),
            scope: TheoryScope::Autism,
            title: "New Autism Theory".to_string(),
            description: "Description of the theory".to_string(),
            criteria: TheoryCriteria {
                genes: vec!["SHANK3".to_string()],
                pathways: vec!["synaptic_transmission".to_string()],
                phenotypes: vec!["autism_spectrum_disorder".to_string()],
            },
            evidence_model: EvidenceModel {
                priors: 0.1,
                likelihood_weights: HashMap::from([
                    ("variant_hit".to_string(), 2.0),
                    ("segregation".to_string(), 1.5),
                    ("pathway".to_string(), 1.0),
                ]),
            },
            author: "anonymous".to_string(),
            created_at: now,
            updated_at: now,
            lifecycle: TheoryLifecycle::Draft,
            tags: vec!["draft".to_string(), "new".to_string()],
            has_comments: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scope_falls_back_to_autism() {
        let t = template("made_up");
        assert_eq!(t.scope, TheoryScope::Autism);
    }

    #[test]
    fn cancer_template_seeds_brca1() {
        let t = template("cancer");
        assert!(t.criteria.genes.contains(&"BRCA1".to_string()));
    }
}
