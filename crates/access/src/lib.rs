//! Access control: gates actions on consent and records every attempt.

pub mod model;
pub mod table;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use consent::ConsentStore;
use ledger::AuditLedger;
use parking_lot::Mutex;
use platform_core::model::LedgerEntryType;
use platform_core::now_rfc3339;
use serde_json::{json, Map, Value};

pub use model::{AccessAttempt, AccessRequest, AccessResult, AccessStats};

struct State {
    log: Vec<AccessAttempt>,
}

/// Checks whether a user holds the consents an action requires, and records
/// every attempt (granted or not) to the access log and the ledger.
#[derive(Clone)]
pub struct AccessControl {
    state: Arc<Mutex<State>>,
    counter: Arc<AtomicU64>,
    consent: ConsentStore,
    ledger: AuditLedger,
}

impl AccessControl {
    pub fn new(consent: ConsentStore, ledger: AuditLedger) -> Self {
        Self {
            state: Arc::new(Mutex::new(State { log: Vec::new() })),
            counter: Arc::new(AtomicU64::new(0)),
            consent,
            ledger,
        }
    }

    /// Behavior is idempotent only in the consent-decision sense: the same
    /// request repeated produces a new `audit_id` and a new ledger entry,
    /// since auditing is per-attempt, not per-decision.
    pub fn check(&self, request: AccessRequest<'_>) -> AccessResult {
        let seq = self.counter.fetch_add(1, Ordering::SeqCst);
        let audit_id = format!("{seq}-{}", now_rfc3339());

        let required = table::required_consents(request.action);
        let (granted, reason, missing) = if required.is_empty() {
            (true, "no consent required".to_string(), Vec::new())
        } else {
            let missing: Vec<_> = required
                .iter()
                .filter(|ct| !self.consent.check(request.user_id, **ct))
                .copied()
                .collect();
            if missing.is_empty() {
                (true, "All required consents valid".to_string(), Vec::new())
            } else {
                let names: Vec<String> = missing.iter().map(|ct| ct.as_str().to_lowercase()).collect();
                (
                    false,
                    format!("Missing consent: {}", names.join(", ")),
                    missing,
                )
            }
        };

        let attempt = AccessAttempt {
            audit_id: audit_id.clone(),
            user_id: request.user_id.to_string(),
            action: request.action,
            resource_id: request.resource_id.to_string(),
            granted,
            reason: reason.clone(),
            consent_types_checked: required.to_vec(),
            timestamp: now_rfc3339(),
            ip_address: request.ip_address.to_string(),
            metadata: Map::new(),
        };
        self.state.lock().log.push(attempt);

        let mut ledger_metadata = Map::new();
        ledger_metadata.insert("access_granted".to_string(), json!(granted));
        ledger_metadata.insert("audit_id".to_string(), json!(audit_id));
        self.ledger.append(
            LedgerEntryType::DataAccess,
            request.user_id,
            &json!({
                "action": request.action,
                "resource_id": request.resource_id,
                "granted": granted,
            }),
            ledger_metadata,
        );

        tracing::debug!(user_id = request.user_id, %request.action, granted, "access check");

        AccessResult {
            audit_id,
            granted,
            reason,
            consent_types_checked: required.to_vec(),
        }
    }

    pub fn access_log(&self, user_id: Option<&str>, limit: usize) -> Vec<AccessAttempt> {
        let state = self.state.lock();
        let mut entries: Vec<AccessAttempt> = state
            .log
            .iter()
            .filter(|a| user_id.map(|u| a.user_id == u).unwrap_or(true))
            .cloned()
            .collect();
        entries.reverse();
        entries.truncate(limit);
        entries
    }

    pub fn access_stats(&self) -> AccessStats {
        let state = self.state.lock();
        let total = state.log.len();
        let granted = state.log.iter().filter(|a| a.granted).count();
        let mut by_action: Map<String, Value> = Map::new();
        let mut users = std::collections::HashSet::new();
        for attempt in &state.log {
            let key = attempt.action.as_str().to_string();
            let count = by_action.get(&key).and_then(Value::as_u64).unwrap_or(0);
            by_action.insert(key, json!(count + 1));
            users.insert(attempt.user_id.clone());
        }
        AccessStats {
            total_requests: total,
            granted,
            denied: total - granted,
            grant_rate: if total == 0 {
                0.0
            } else {
                granted as f64 / total as f64
            },
            by_action,
            unique_users: users.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_core::model::{Action, ConsentType};
    use serde_json::Map as JsonMap;

    fn platform() -> (AccessControl, ConsentStore) {
        let ledger = AuditLedger::new();
        let consent = ConsentStore::new(ledger.clone());
        let access = AccessControl::new(consent.clone(), ledger);
        (access, consent)
    }

    #[test]
    fn s1_access_granted_after_consent() {
        let (access, consent) = platform();
        let mut data = JsonMap::new();
        data.insert("full_name".to_string(), json!("Jane Doe"));
        data.insert("date_of_birth".to_string(), json!("1990-01-01"));
        data.insert("email".to_string(), json!("jane@example.com"));
        consent
            .capture("user_001", "genomic_analysis_v1", data, "127.0.0.1", "ua", "sig")
            .unwrap();

        let result = access.check(AccessRequest {
            user_id: "user_001",
            action: Action::AnalyzeVariants,
            resource_id: "/genes/BRCA1/interpret",
            ip_address: "127.0.0.1",
        });

        assert!(result.granted);
        assert_eq!(result.reason, "All required consents valid");
        assert!(result
            .consent_types_checked
            .contains(&ConsentType::GenomicAnalysis));
        assert_eq!(access.access_log(Some("user_001"), 100).len(), 1);
    }

    #[test]
    fn s2_access_denied_without_consent() {
        let (access, _consent) = platform();
        let result = access.check(AccessRequest {
            user_id: "user_001",
            action: Action::AnalyzeVariants,
            resource_id: "/genes/BRCA1/interpret",
            ip_address: "127.0.0.1",
        });
        assert!(!result.granted);
        assert!(result.reason.contains("genomic_analysis"));
    }

    #[test]
    fn repeated_identical_request_yields_distinct_audit_ids() {
        let (access, _consent) = platform();
        let r1 = access.check(AccessRequest {
            user_id: "u",
            action: Action::ShareData,
            resource_id: "/x",
            ip_address: "127.0.0.1",
        });
        let r2 = access.check(AccessRequest {
            user_id: "u",
            action: Action::ShareData,
            resource_id: "/x",
            ip_address: "127.0.0.1",
        });
        assert_ne!(r1.audit_id, r2.audit_id);
    }
}
