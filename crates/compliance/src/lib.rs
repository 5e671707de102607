//! Privacy impact assessments, data processing agreements, and breach
//! notifications, with a compliance scoring function over all three.

pub mod model;

use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::Mutex;

pub use model::{
    BreachNotification, BreachSeverity, BreachStatus, ComplianceReport, ComplianceStatus,
    DataProcessingAgreement, DpaStatus, PiaStatus, PrivacyAssessment, RiskLevel,
};

const BREACH_NOTIFICATION_HOURS: i64 = 72;
const DPA_DEFAULT_VALIDITY_DAYS: i64 = 1095;
const DPA_EXPIRING_SOON_DAYS: i64 = 90;

struct State {
    assessments: std::collections::HashMap<String, PrivacyAssessment>,
    dpas: std::collections::HashMap<String, DataProcessingAgreement>,
    breaches: std::collections::HashMap<String, BreachNotification>,
}

/// PIA, DPA, and breach registry. A default genomic-research PIA and a DPA
/// template are seeded at construction, mirroring the reference deployment.
#[derive(Clone)]
pub struct ComplianceRegistry {
    state: Arc<Mutex<State>>,
}

impl ComplianceRegistry {
    pub fn new() -> Self {
        let now = Utc::now();
        let seed_pia = PrivacyAssessment {
            pia_id: "pia_genomic_001".to_string(),
            purpose: "Genomic research and variant analysis for rare disease diagnosis".to_string(),
            data_categories: vec![
                "genetic_data".to_string(),
                "health_data".to_string(),
                "personal_identifiers".to_string(),
            ],
            processing_activities: vec![
                "variant_analysis".to_string(),
                "theory_testing".to_string(),
                "report_generation".to_string(),
            ],
            risk_level: RiskLevel::High,
            status: PiaStatus::Approved,
            mitigation_measures: vec![
                "End-to-end encryption (AES-256)".to_string(),
                "Consent-based access control".to_string(),
                "Immutable audit trails".to_string(),
                "Regular security assessments".to_string(),
                "Data minimization principles".to_string(),
            ],
            created_at: now,
            updated_at: now,
            reviewer: Some("dpo@dnaresearch.org".to_string()),
            approval_date: Some(now),
        };
        let seed_dpa = DataProcessingAgreement {
            dpa_id: "dpa_template_001".to_string(),
            partner_name: "Sequencing Partner Template".to_string(),
            purpose: "Genomic sequencing and data processing".to_string(),
            data_categories: vec![
                "genetic_samples".to_string(),
                "sequencing_data".to_string(),
                "quality_metrics".to_string(),
            ],
            retention_period: "7 years post-analysis".to_string(),
            security_measures: vec![
                "ISO 27001 certification".to_string(),
                "SOC 2 Type II compliance".to_string(),
                "Encrypted data transmission".to_string(),
                "Access logging and monitoring".to_string(),
            ],
            signed_date: None,
            expiry_date: None,
            status: DpaStatus::Template,
        };

        let mut assessments = std::collections::HashMap::new();
        assessments.insert(seed_pia.pia_id.clone(), seed_pia);
        let mut dpas = std::collections::HashMap::new();
        dpas.insert(seed_dpa.dpa_id.clone(), seed_dpa);

        Self {
            state: Arc::new(Mutex::new(State {
                assessments,
                dpas,
                breaches: std::collections::HashMap::new(),
            })),
        }
    }

    pub fn create_privacy_assessment(
        &self,
        purpose: &str,
        data_categories: Vec<String>,
        processing_activities: Vec<String>,
    ) -> PrivacyAssessment {
        let mut state = self.state.lock();
        let pia_id = format!("pia_{:03}", state.assessments.len() + 1);

        let risk_level = if data_categories.iter().any(|c| c == "biometric_data") {
            RiskLevel::VeryHigh
        } else if data_categories.iter().any(|c| c == "genetic_data" || c == "health_data") {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        };

        let mut mitigation_measures = vec![
            "Data encryption at rest and in transit".to_string(),
            "Access control and authentication".to_string(),
            "Regular security audits".to_string(),
        ];
        if matches!(risk_level, RiskLevel::High | RiskLevel::VeryHigh) {
            mitigation_measures.extend([
                "Pseudonymization of personal data".to_string(),
                "Consent management system".to_string(),
                "Data retention policies".to_string(),
                "Incident response procedures".to_string(),
            ]);
        }

        let now = Utc::now();
        let data_categories = if data_categories.is_empty() {
            vec!["personal_data".to_string()]
        } else {
            data_categories
        };
        let processing_activities = if processing_activities.is_empty() {
            vec!["data_analysis".to_string()]
        } else {
            processing_activities
        };

        let pia = PrivacyAssessment {
            pia_id: pia_id.clone(),
            purpose: purpose.to_string(),
            data_categories,
            processing_activities,
            risk_level,
            status: PiaStatus::Draft,
            mitigation_measures,
            created_at: now,
            updated_at: now,
            reviewer: None,
            approval_date: None,
        };
        state.assessments.insert(pia_id, pia.clone());
        tracing::info!(pia_id = %pia.pia_id, "privacy assessment created");
        pia
    }

    pub fn create_dpa(
        &self,
        partner_name: &str,
        purpose: &str,
        data_categories: Vec<String>,
        retention_period: &str,
    ) -> DataProcessingAgreement {
        let mut state = self.state.lock();
        let dpa_id = format!("dpa_{:03}", state.dpas.len() + 1);
        let now = Utc::now();

        let dpa = DataProcessingAgreement {
            dpa_id: dpa_id.clone(),
            partner_name: partner_name.to_string(),
            purpose: purpose.to_string(),
            data_categories,
            retention_period: retention_period.to_string(),
            security_measures: vec![
                "End-to-end encryption (AES-256)".to_string(),
                "Multi-factor authentication".to_string(),
                "Regular security assessments".to_string(),
                "Incident response procedures".to_string(),
                "Data breach notification within 72 hours".to_string(),
                "Staff training on data protection".to_string(),
            ],
            signed_date: Some(now),
            expiry_date: Some(now + Duration::days(DPA_DEFAULT_VALIDITY_DAYS)),
            status: DpaStatus::Active,
        };
        state.dpas.insert(dpa_id, dpa.clone());
        dpa
    }

    pub fn report_breach(
        &self,
        description: &str,
        affected_count: u64,
        severity: BreachSeverity,
        data_categories: Vec<String>,
    ) -> BreachNotification {
        let mut state = self.state.lock();
        let breach_id = format!("breach_{:03}", state.breaches.len() + 1);
        let now = Utc::now();

        let data_categories = if data_categories.is_empty() {
            vec!["unknown".to_string()]
        } else {
            data_categories
        };

        let breach = BreachNotification {
            breach_id: breach_id.clone(),
            severity,
            description: description.to_string(),
            affected_count,
            data_categories,
            reported_at: now,
            status: BreachStatus::Reported,
            containment_measures: vec![
                "Immediate system isolation".to_string(),
                "Access revocation for affected accounts".to_string(),
                "Forensic analysis initiated".to_string(),
                "Incident response team activated".to_string(),
            ],
            notification_deadline: now + Duration::hours(BREACH_NOTIFICATION_HOURS),
            regulatory_notified: false,
            affected_notified: false,
        };
        state.breaches.insert(breach_id, breach.clone());
        tracing::warn!(breach_id = %breach.breach_id, ?severity, "breach reported");
        breach
    }

    pub fn update_breach_status(&self, breach_id: &str, status: BreachStatus, notify_regulatory: bool) -> bool {
        let mut state = self.state.lock();
        let Some(breach) = state.breaches.get_mut(breach_id) else { return false };
        breach.status = status;
        if notify_regulatory {
            breach.regulatory_notified = true;
            breach.status = BreachStatus::RegulatoryNotified;
        }
        true
    }

    pub fn list_assessments(&self) -> Vec<PrivacyAssessment> {
        self.state.lock().assessments.values().cloned().collect()
    }

    pub fn list_breaches(&self) -> Vec<BreachNotification> {
        self.state.lock().breaches.values().cloned().collect()
    }

    pub fn list_dpas(&self) -> Vec<DataProcessingAgreement> {
        self.state
            .lock()
            .dpas
            .values()
            .filter(|d| !matches!(d.status, DpaStatus::Template))
            .cloned()
            .collect()
    }

    pub fn dpa_template(&self) -> Option<DataProcessingAgreement> {
        self.state
            .lock()
            .dpas
            .values()
            .find(|d| matches!(d.status, DpaStatus::Template))
            .cloned()
    }

    fn expiring_dpa_count(state: &State) -> usize {
        let threshold = Utc::now() + Duration::days(DPA_EXPIRING_SOON_DAYS);
        state
            .dpas
            .values()
            .filter(|d| matches!(d.status, DpaStatus::Active))
            .filter(|d| d.expiry_date.map(|e| e <= threshold).unwrap_or(false))
            .count()
    }

    /// `0.4*approved_pia_ratio + 0.3*resolved_breach_ratio +
    /// 0.3*active_dpa_ratio`, each term defaulting to its full
    /// contribution when its population is empty.
    pub fn compliance_status(&self) -> ComplianceStatus {
        let state = self.state.lock();

        let total_pias = state.assessments.len();
        let approved_pias = state
            .assessments
            .values()
            .filter(|p| matches!(p.status, PiaStatus::Approved))
            .count();
        let pending_review_pias = state
            .assessments
            .values()
            .filter(|p| matches!(p.status, PiaStatus::UnderReview))
            .count();

        let total_breaches = state.breaches.len();
        let resolved_breaches = state
            .breaches
            .values()
            .filter(|b| matches!(b.status, BreachStatus::Resolved))
            .count();
        let now = Utc::now();
        let overdue_breaches = state
            .breaches
            .values()
            .filter(|b| matches!(b.status, BreachStatus::Reported | BreachStatus::Investigating))
            .filter(|b| now > b.notification_deadline)
            .count();

        let total_dpas = state
            .dpas
            .values()
            .filter(|d| !matches!(d.status, DpaStatus::Template))
            .count();
        let active_dpas = state
            .dpas
            .values()
            .filter(|d| matches!(d.status, DpaStatus::Active))
            .count();

        let pia_term = if total_pias > 0 { approved_pias as f64 / total_pias as f64 } else { 1.0 };
        let breach_term = if total_breaches > 0 { resolved_breaches as f64 / total_breaches as f64 } else { 1.0 };
        let dpa_term = if total_dpas > 0 { active_dpas as f64 / total_dpas as f64 } else { 1.0 };
        let compliance_score = (0.4 * pia_term + 0.3 * breach_term + 0.3 * dpa_term).min(1.0);

        ComplianceStatus {
            compliance_score,
            total_pias,
            approved_pias,
            pending_review_pias,
            total_breaches,
            resolved_breaches,
            overdue_breaches,
            total_dpas,
            active_dpas,
            expiring_soon_dpas: Self::expiring_dpa_count(&state),
        }
    }

    pub fn compliance_report(&self) -> ComplianceReport {
        let status = self.compliance_status();
        let state = self.state.lock();

        let high_risk_activities = state
            .assessments
            .values()
            .filter(|p| matches!(p.risk_level, RiskLevel::High | RiskLevel::VeryHigh))
            .count();
        let critical_breaches = state
            .breaches
            .values()
            .filter(|b| matches!(b.severity, BreachSeverity::Critical))
            .count();
        let regulatory_notifications_required = state
            .breaches
            .values()
            .filter(|b| !b.regulatory_notified)
            .filter(|b| matches!(b.severity, BreachSeverity::High | BreachSeverity::Critical))
            .count();
        drop(state);

        let mut recommendations = Vec::new();
        if status.pending_review_pias > 0 {
            recommendations.push("Review and approve pending privacy impact assessments".to_string());
        }
        if status.overdue_breaches > 0 {
            recommendations.push("Address overdue breach notifications to regulatory authorities".to_string());
        }
        if status.expiring_soon_dpas > 0 {
            recommendations.push("Renew expiring data processing agreements".to_string());
        }
        if status.compliance_score < 0.8 {
            recommendations.push("Improve overall compliance score through systematic remediation".to_string());
        }

        let now = Utc::now();
        ComplianceReport {
            report_id: format!("compliance_report_{}", now.format("%Y%m%d_%H%M%S")),
            generated_at: now,
            status,
            high_risk_activities,
            critical_breaches,
            regulatory_notifications_required,
            recommendations,
            next_review_date: now + Duration::days(DPA_EXPIRING_SOON_DAYS),
        }
    }
}

impl Default for ComplianceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_the_default_pia_and_dpa_template() {
        let registry = ComplianceRegistry::new();
        assert_eq!(registry.list_assessments().len(), 1);
        assert!(registry.dpa_template().is_some());
        assert!(registry.list_dpas().is_empty());
    }

    #[test]
    fn compliance_score_is_full_when_populations_are_empty() {
        let registry = ComplianceRegistry::new();
        let status = registry.compliance_status();
        // one approved PIA, no breaches, no DPAs yet.
        assert!((status.compliance_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn genetic_data_categories_raise_risk_to_high() {
        let registry = ComplianceRegistry::new();
        let pia = registry.create_privacy_assessment(
            "test",
            vec!["genetic_data".to_string()],
            vec![],
        );
        assert_eq!(pia.risk_level, RiskLevel::High);
        assert!(pia.mitigation_measures.len() > 3);
    }

    #[test]
    fn breach_deadline_is_72_hours_out() {
        let registry = ComplianceRegistry::new();
        let breach = registry.report_breach("test breach", 10, BreachSeverity::High, vec![]);
        let delta = breach.notification_deadline - breach.reported_at;
        assert_eq!(delta.num_hours(), 72);
    }

    #[test]
    fn update_breach_status_reports_unknown_id() {
        let registry = ComplianceRegistry::new();
        assert!(!registry.update_breach_status("missing", BreachStatus::Resolved, false));
    }

    #[test]
    fn notify_regulatory_overrides_status() {
        let registry = ComplianceRegistry::new();
        let breach = registry.report_breach("test breach", 1, BreachSeverity::Critical, vec![]);
        assert!(registry.update_breach_status(&breach.breach_id, BreachStatus::Investigating, true));
        let stored = registry.list_breaches().into_iter().find(|b| b.breach_id == breach.breach_id).unwrap();
        assert_eq!(stored.status, BreachStatus::RegulatoryNotified);
        assert!(stored.regulatory_notified);
    }
}
