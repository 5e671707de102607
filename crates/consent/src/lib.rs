//! Consent capture, checking, and withdrawal.

pub mod error;
pub mod forms;
pub mod model;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use ledger::AuditLedger;
use parking_lot::Mutex;
use platform_core::model::{ConsentType, LedgerEntryType};
use platform_core::{canonical_json, sha256_hex};
use serde_json::{json, Map, Value};

pub use error::{ConsentError, Result};
pub use model::{ConsentForm, ConsentRecord, ConsentStats, ConsentStatus};

struct State {
    forms: HashMap<String, ConsentForm>,
    records: Vec<ConsentRecord>,
}

/// Owns every registered consent form and every captured consent record.
#[derive(Clone)]
pub struct ConsentStore {
    state: Arc<Mutex<State>>,
    ledger: AuditLedger,
}

impl ConsentStore {
    pub fn new(ledger: AuditLedger) -> Self {
        let forms = forms::default_forms()
            .into_iter()
            .map(|f| (f.form_id.clone(), f))
            .collect();
        Self {
            state: Arc::new(Mutex::new(State {
                forms,
                records: Vec::new(),
            })),
            ledger,
        }
    }

    pub fn get_form(&self, form_id: &str) -> Option<ConsentForm> {
        self.state.lock().forms.get(form_id).cloned()
    }

    pub fn list_forms(&self) -> Vec<ConsentForm> {
        self.state.lock().forms.values().cloned().collect()
    }

    pub fn register_form(&self, form: ConsentForm) -> Result<()> {
        let mut state = self.state.lock();
        if state.forms.contains_key(&form.form_id) {
            return Err(ConsentError::FormAlreadyRegistered(form.form_id));
        }
        state.forms.insert(form.form_id.clone(), form);
        Ok(())
    }

    /// Captures consent for every type the form grants. Returns all records
    /// created, with the first one as the conventional "primary" result.
    pub fn capture(
        &self,
        user_id: &str,
        form_id: &str,
        user_data: Map<String, Value>,
        ip_address: &str,
        user_agent: &str,
        digital_signature: &str,
    ) -> Result<Vec<ConsentRecord>> {
        let mut state = self.state.lock();
        let form = state
            .forms
            .get(form_id)
            .cloned()
            .ok_or_else(|| ConsentError::FormNotFound(form_id.to_string()))?;

        for field in &form.required_fields {
            if !user_data.contains_key(field) {
                return Err(ConsentError::MissingField(field.clone()));
            }
        }

        let now = Utc::now();
        let consent_text_hash = sha256_hex(&form.consent_text);
        let prefix = sha256_hex(format!("{user_id}|{form_id}|{}", now.to_rfc3339()))[..16]
            .to_string();
        let expires_at = form.validity_days.map(|days| now + Duration::days(days));

        let mut metadata = Map::new();
        metadata.insert("form_id".to_string(), json!(form.form_id));
        metadata.insert("form_version".to_string(), json!(form.version));
        metadata.insert("user_data".to_string(), Value::Object(user_data.clone()));

        let mut created = Vec::with_capacity(form.consent_types.len());
        for (i, consent_type) in form.consent_types.iter().enumerate() {
            let record = ConsentRecord {
                consent_id: format!("{prefix}-{i}"),
                user_id: user_id.to_string(),
                consent_type: *consent_type,
                status: ConsentStatus::Active,
                granted_at: now,
                expires_at,
                withdrawn_at: None,
                digital_signature: digital_signature.to_string(),
                ip_address: ip_address.to_string(),
                user_agent: user_agent.to_string(),
                consent_text_hash: consent_text_hash.clone(),
                metadata: metadata.clone(),
            };
            state.records.push(record.clone());
            created.push(record);
        }
        drop(state);

        self.ledger.append(
            LedgerEntryType::ConsentGranted,
            user_id,
            &json!({"form_id": form_id, "consent_types": form.consent_types}),
            metadata,
        );
        tracing::info!(user_id, form_id, "consent captured");
        Ok(created)
    }

    /// Checks whether the newest ACTIVE record for `(user_id, consent_type)`
    /// is still valid, lazily expiring it if its validity window has
    /// passed.
    pub fn check(&self, user_id: &str, consent_type: ConsentType) -> bool {
        let mut state = self.state.lock();
        let now = Utc::now();
        let mut candidate_idx: Option<usize> = None;
        let mut candidate_granted_at = None;
        for (idx, record) in state.records.iter().enumerate() {
            if record.user_id == user_id
                && record.consent_type == consent_type
                && record.status == ConsentStatus::Active
                && candidate_granted_at.map(|g| record.granted_at > g).unwrap_or(true)
            {
                candidate_idx = Some(idx);
                candidate_granted_at = Some(record.granted_at);
            }
        }
        let Some(idx) = candidate_idx else {
            return false;
        };
        let expired = state.records[idx]
            .expires_at
            .map(|exp| exp < now)
            .unwrap_or(false);
        if expired {
            state.records[idx].status = ConsentStatus::Expired;
            return false;
        }
        true
    }

    /// Withdraws every ACTIVE record for `(user_id, consent_type)`. Returns
    /// true iff at least one record was withdrawn.
    pub fn withdraw(&self, user_id: &str, consent_type: ConsentType, reason: &str) -> bool {
        let mut state = self.state.lock();
        let now = Utc::now();
        let mut withdrew_any = false;
        for record in state.records.iter_mut() {
            if record.user_id == user_id
                && record.consent_type == consent_type
                && record.status == ConsentStatus::Active
            {
                record.status = ConsentStatus::Withdrawn;
                record.withdrawn_at = Some(now);
                record
                    .metadata
                    .insert("withdrawal_reason".to_string(), json!(reason));
                withdrew_any = true;
            }
        }
        drop(state);
        if withdrew_any {
            self.ledger.append(
                LedgerEntryType::ConsentWithdrawn,
                user_id,
                &json!({"consent_type": consent_type, "reason": reason}),
                Map::new(),
            );
            tracing::info!(user_id, %consent_type, "consent withdrawn");
        }
        withdrew_any
    }

    pub fn user_consents(&self, user_id: &str) -> Vec<ConsentRecord> {
        self.state
            .lock()
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// `valid ⇔ signature begins with the 16-char prefix of
    /// SHA256(consent_text || canonical(user_data))`.
    pub fn validate_digital_signature(
        consent_text: &str,
        user_data: &Value,
        signature: &str,
    ) -> bool {
        let expected = sha256_hex(format!("{consent_text}{}", canonical_json(user_data)));
        signature.starts_with(&expected[..16])
    }

    pub fn consent_stats(&self) -> ConsentStats {
        let state = self.state.lock();
        let mut by_status: Map<String, Value> = Map::new();
        let mut by_type: Map<String, Value> = Map::new();
        let mut active_users = std::collections::HashSet::new();
        for record in &state.records {
            let status_key = format!("{:?}", record.status).to_uppercase();
            let count = by_status.get(&status_key).and_then(Value::as_u64).unwrap_or(0);
            by_status.insert(status_key, json!(count + 1));

            let type_key = record.consent_type.as_str().to_string();
            let count = by_type.get(&type_key).and_then(Value::as_u64).unwrap_or(0);
            by_type.insert(type_key, json!(count + 1));

            if record.status == ConsentStatus::Active {
                active_users.insert(record.user_id.clone());
            }
        }
        ConsentStats {
            total: state.records.len(),
            by_status,
            by_type,
            users_with_active_consent: active_users.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConsentStore {
        ConsentStore::new(AuditLedger::new())
    }

    fn user_data() -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("full_name".to_string(), json!("Jane Doe"));
        m.insert("date_of_birth".to_string(), json!("1990-01-01"));
        m.insert("email".to_string(), json!("jane@example.com"));
        m
    }

    #[test]
    fn capture_yields_one_record_per_granted_type() {
        let store = store();
        let records = store
            .capture("user_001", "genomic_analysis_v1", user_data(), "127.0.0.1", "ua", "sig")
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].consent_id.starts_with(&records[1].consent_id[..16]));
    }

    #[test]
    fn capture_fails_on_unknown_form() {
        let store = store();
        let err = store
            .capture("user_001", "nonexistent", user_data(), "127.0.0.1", "ua", "sig")
            .unwrap_err();
        assert!(matches!(err, ConsentError::FormNotFound(_)));
    }

    #[test]
    fn capture_fails_on_missing_field() {
        let store = store();
        let mut data = user_data();
        data.remove("email");
        let err = store
            .capture("user_001", "genomic_analysis_v1", data, "127.0.0.1", "ua", "sig")
            .unwrap_err();
        assert!(matches!(err, ConsentError::MissingField(_)));
    }

    #[test]
    fn check_true_after_capture_false_after_withdraw() {
        let store = store();
        store
            .capture("user_001", "genomic_analysis_v1", user_data(), "127.0.0.1", "ua", "sig")
            .unwrap();
        assert!(store.check("user_001", ConsentType::GenomicAnalysis));
        assert!(store.withdraw("user_001", ConsentType::GenomicAnalysis, "user request"));
        assert!(!store.check("user_001", ConsentType::GenomicAnalysis));
    }

    #[test]
    fn check_false_without_capture() {
        let store = store();
        assert!(!store.check("user_001", ConsentType::GenomicAnalysis));
    }

    #[test]
    fn withdraw_without_active_record_returns_false() {
        let store = store();
        assert!(!store.withdraw("user_001", ConsentType::GenomicAnalysis, "n/a"));
    }

    #[test]
    fn digital_signature_prefix_match() {
        let text = "consent text";
        let data = json!({"a": 1});
        let expected = sha256_hex(format!("{text}{}", canonical_json(&data)));
        assert!(ConsentStore::validate_digital_signature(
            text,
            &data,
            &expected[..16]
        ));
        assert!(!ConsentStore::validate_digital_signature(text, &data, "wrong"));
    }
}
