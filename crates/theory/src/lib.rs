//! Theory definition, validation, execution, forking, and listing.

pub mod error;
pub mod execute;
pub mod forker;
pub mod model;
pub mod regions;
pub mod templates;
pub mod validate;

use std::sync::Arc;

use chrono::Utc;
use evidence::EvidenceAccumulator;
use ledger::AuditLedger;
use parking_lot::Mutex;
use platform_core::model::LedgerEntryType;
use serde_json::{json, Map, Value};

pub use error::{Result, TheoryError};
pub use model::{
    EvidenceModel, ExecutionResult, ForkResult, Theory, TheoryCreationResult, TheoryCriteria,
    TheoryLifecycle, TheoryLineage, TheoryScope, TheoryStats,
};

type Key = (String, String);

struct State {
    theories: std::collections::HashMap<Key, Theory>,
    forker: forker::Forker,
}

#[derive(Clone)]
pub struct TheoryEngine {
    state: Arc<Mutex<State>>,
    evidence: EvidenceAccumulator,
    ledger: AuditLedger,
}

pub struct ListFilter {
    pub scope: Option<TheoryScope>,
    pub lifecycle: Option<TheoryLifecycle>,
    pub author: Option<String>,
    pub has_comments: Option<bool>,
    pub search: Option<String>,
    pub tags: Vec<String>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            scope: None,
            lifecycle: None,
            author: None,
            has_comments: None,
            search: None,
            tags: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Posterior,
    EvidenceCount,
    CreatedAt,
    UpdatedAt,
    Title,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

pub struct Page {
    pub items: Vec<Theory>,
    pub total: usize,
    pub has_more: bool,
}

impl TheoryEngine {
    pub fn new(evidence: EvidenceAccumulator, ledger: AuditLedger) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                theories: std::collections::HashMap::new(),
                forker: forker::Forker::new(),
            })),
            evidence,
            ledger,
        }
    }

    pub fn template(&self, scope: &str) -> Theory {
        templates::template(scope)
    }

    /// Assigns an id/version if absent, validates, and stores on success.
    pub fn create(&self, mut theory: Theory, author: &str) -> TheoryCreationResult {
        if theory.id.is_empty() {
            theory.id = format!("{}-theory-{}", theory.scope.as_str(), Utc::now().timestamp());
        }
        let now = Utc::now();
        theory.created_at = now;
        theory.updated_at = now;
        theory.author = author.to_string();
        theory.lifecycle = TheoryLifecycle::Draft;

        let errors = validate::validate_theory(&theory);
        if !errors.is_empty() {
            return TheoryCreationResult {
                theory_id: theory.id,
                version: theory.version,
                status: "validation_failed".to_string(),
                validation_errors: errors,
            };
        }

        let key = (theory.id.clone(), theory.version.clone());
        let mut state = self.state.lock();
        state.theories.insert(key, theory.clone());
        tracing::info!(theory_id = %theory.id, version = %theory.version, "theory created");
        TheoryCreationResult {
            theory_id: theory.id,
            version: theory.version,
            status: "created".to_string(),
            validation_errors: Vec::new(),
        }
    }

    pub fn update(&self, theory_id: &str, version: &str, updates: Theory, author: &str) -> TheoryCreationResult {
        let key = (theory_id.to_string(), version.to_string());
        let mut state = self.state.lock();
        if !state.theories.contains_key(&key) {
            return TheoryCreationResult {
                theory_id: theory_id.to_string(),
                version: version.to_string(),
                status: "not_found".to_string(),
                validation_errors: vec!["Theory not found".to_string()],
            };
        }
        let mut merged = updates;
        merged.updated_at = Utc::now();
        merged.author = author.to_string();

        let errors = validate::validate_theory(&merged);
        if !errors.is_empty() {
            return TheoryCreationResult {
                theory_id: theory_id.to_string(),
                version: version.to_string(),
                status: "validation_failed".to_string(),
                validation_errors: errors,
            };
        }
        state.theories.insert(key, merged);
        TheoryCreationResult {
            theory_id: theory_id.to_string(),
            version: version.to_string(),
            status: "updated".to_string(),
            validation_errors: Vec::new(),
        }
    }

    pub fn get(&self, theory_id: &str, version: &str) -> Option<Theory> {
        self.state
            .lock()
            .theories
            .get(&(theory_id.to_string(), version.to_string()))
            .cloned()
    }

    pub fn delete(&self, theory_id: &str, version: &str) -> bool {
        self.state
            .lock()
            .theories
            .remove(&(theory_id.to_string(), version.to_string()))
            .is_some()
    }

    /// Runs a theory against `vcf_text`, posts the resulting Bayes factor
    /// as evidence, and records both a theory_execution ledger entry and
    /// the execution artifact hash.
    pub fn execute(&self, theory: &Theory, vcf_text: &str, family_id: &str) -> ExecutionResult {
        let result = execute::execute(theory, vcf_text, family_id);

        let _ = self.evidence.add_evidence(
            &theory.id,
            &theory.version,
            family_id,
            result.bayes_factor.max(0.01),
            "variant_hit",
            1.0,
            "theory_execution",
        );

        self.ledger.append(
            LedgerEntryType::TheoryExecution,
            family_id,
            &json!({
                "theory_id": result.theory_id,
                "theory_version": result.theory_version,
                "gene_hits": result.gene_hits,
                "bayes_factor": result.bayes_factor,
                "artifact_hash": result.artifact_hash,
            }),
            Map::new(),
        );
        tracing::info!(theory_id = %theory.id, bayes_factor = result.bayes_factor, "theory executed");
        result
    }

    pub fn fork(
        &self,
        parent: &Theory,
        new_theory_id: &str,
        modifications: Map<String, Value>,
        reason: &str,
    ) -> (ForkResult, Theory) {
        let mut state = self.state.lock();
        let (result, new_theory) = state.forker.fork(parent, new_theory_id, modifications, reason);
        state
            .theories
            .insert((new_theory.id.clone(), new_theory.version.clone()), new_theory.clone());
        (result, new_theory)
    }

    pub fn lineage(&self, theory_id: &str, version: &str) -> Option<TheoryLineage> {
        self.state.lock().forker.lineage(theory_id, version)
    }

    pub fn children(&self, parent_id: &str, parent_version: &str) -> Vec<TheoryLineage> {
        self.state.lock().forker.children(parent_id, parent_version)
    }

    pub fn ancestry(&self, theory_id: &str, version: &str) -> Vec<TheoryLineage> {
        self.state.lock().forker.ancestry(theory_id, version)
    }

    pub fn list(&self, filter: &ListFilter, sort: SortKey, order: SortOrder, limit: usize, offset: usize) -> Page {
        let state = self.state.lock();
        let mut items: Vec<Theory> = state
            .theories
            .values()
            .filter(|t| filter.scope.map(|s| s == t.scope).unwrap_or(true))
            .filter(|t| filter.lifecycle.map(|l| l == t.lifecycle).unwrap_or(true))
            .filter(|t| filter.author.as_deref().map(|a| a == t.author).unwrap_or(true))
            .filter(|t| filter.has_comments.map(|h| h == t.has_comments).unwrap_or(true))
            .filter(|t| {
                filter
                    .search
                    .as_deref()
                    .map(|needle| {
                        let needle = needle.to_lowercase();
                        t.title.to_lowercase().contains(&needle)
                            || t.id.to_lowercase().contains(&needle)
                            || t.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
                    })
                    .unwrap_or(true)
            })
            .filter(|t| filter.tags.iter().all(|tag| t.tags.contains(tag)))
            .cloned()
            .collect();

        items.sort_by(|a, b| {
            let ordering = match sort {
                SortKey::Posterior => {
                    let pa = self.evidence.update_posterior(&a.id, &a.version, a.evidence_model.priors).posterior;
                    let pb = self.evidence.update_posterior(&b.id, &b.version, b.evidence_model.priors).posterior;
                    pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
                }
                SortKey::EvidenceCount => self
                    .evidence
                    .evidence_trail(&a.id, &a.version)
                    .len()
                    .cmp(&self.evidence.evidence_trail(&b.id, &b.version).len()),
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortKey::Title => a.title.cmp(&b.title),
            };
            if order == SortOrder::Desc {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let total = items.len();
        let page: Vec<Theory> = items.into_iter().skip(offset).take(limit).collect();
        let has_more = offset + page.len() < total;
        Page { items: page, total, has_more }
    }

    pub fn theory_stats(&self) -> TheoryStats {
        let state = self.state.lock();
        let total = state.theories.len();
        let active = state
            .theories
            .values()
            .filter(|t| t.lifecycle == TheoryLifecycle::Active)
            .count();
        let mut by_scope: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        let mut posterior_sum = 0.0;
        for theory in state.theories.values() {
            *by_scope.entry(theory.scope.as_str().to_string()).or_insert(0) += 1;
            posterior_sum += self
                .evidence
                .update_posterior(&theory.id, &theory.version, theory.evidence_model.priors)
                .posterior;
        }
        TheoryStats {
            total,
            active,
            by_scope,
            average_posterior: if total == 0 { 0.0 } else { posterior_sum / total as f64 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TheoryEngine {
        TheoryEngine::new(EvidenceAccumulator::new(), AuditLedger::new())
    }

    #[test]
    fn create_assigns_id_and_validates() {
        let engine = engine();
        let theory = templates::template("autism");
        let result = engine.create(theory, "dr.smith");
        assert_eq!(result.status, "created");
        assert!(result.theory_id.starts_with("autism-theory-"));
    }

    #[test]
    fn create_rejects_empty_criteria() {
        let engine = engine();
        let mut theory = templates::template("autism");
        theory.criteria = TheoryCriteria::default();
        let result = engine.create(theory, "dr.smith");
        assert_eq!(result.status, "validation_failed");
        assert!(!result.validation_errors.is_empty());
    }

    #[test]
    fn fork_increments_patch_version_and_records_lineage() {
        let engine = engine();
        let created = engine.create(templates::template("autism"), "dr.smith");
        let parent = engine.get(&created.theory_id, &created.version).unwrap();

        let (fork_result, child) = engine.fork(&parent, "autism-theory-fork", Map::new(), "user_modification");
        assert_eq!(fork_result.new_version, "1.0.1");
        assert_eq!(child.version, "1.0.1");

        let lineage = engine.lineage(&child.id, &child.version).unwrap();
        assert_eq!(lineage.parent_id.as_deref(), Some(parent.id.as_str()));

        let children = engine.children(&parent.id, &parent.version);
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn list_filters_by_scope() {
        let engine = engine();
        engine.create(templates::template("autism"), "a");
        engine.create(templates::template("cancer"), "b");
        let filter = ListFilter { scope: Some(TheoryScope::Cancer), ..Default::default() };
        let page = engine.list(&filter, SortKey::Title, SortOrder::Asc, 10, 0);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].scope, TheoryScope::Cancer);
    }

    #[test]
    fn list_paginates_and_reports_has_more() {
        let engine = engine();
        for _ in 0..3 {
            engine.create(templates::template("autism"), "a");
        }
        let page = engine.list(&ListFilter::default(), SortKey::Title, SortOrder::Asc, 2, 0);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 3);
        assert!(page.has_more);
    }
}
