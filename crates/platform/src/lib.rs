//! Composition root: wires every component into one `Platform` handle.
//!
//! Nothing here is a singleton — callers construct a `Platform` once at
//! startup and pass the handle (or its component handles) into whatever
//! serves requests. Every component is itself a cheap `Clone` over an
//! `Arc`-guarded state, so the handle can be shared across tasks without
//! another layer of locking.

pub mod config;

use access::AccessControl;
use cache::ResponseCache;
use compliance::ComplianceRegistry;
use consent::ConsentStore;
use evidence::EvidenceAccumulator;
use genomic_storage::GenomicStorage;
use ledger::AuditLedger;
use theory::TheoryEngine;
use upload::UploadCoordinator;
use webhook::WebhookPipeline;

pub use config::PlatformConfig;

/// Every component of the platform, wired in dependency order.
///
/// Construction order matters: `consent` needs `ledger`, `access` needs
/// both `consent` and `ledger`, and `theory` needs `evidence` and `ledger`.
/// Components with no cross-component dependency (`genomic_storage`,
/// `webhook`, `cache`, `compliance`, `upload`) are built independently.
#[derive(Clone)]
pub struct Platform {
    pub ledger: AuditLedger,
    pub consent: ConsentStore,
    pub access: AccessControl,
    pub genomic_storage: GenomicStorage,
    pub evidence: EvidenceAccumulator,
    pub theory: TheoryEngine,
    pub webhook: WebhookPipeline,
    pub cache: ResponseCache,
    pub compliance: ComplianceRegistry,
    pub upload: UploadCoordinator,
}

impl Platform {
    pub fn new() -> Self {
        Self::with_config(&PlatformConfig::default())
    }

    pub fn with_config(config: &PlatformConfig) -> Self {
        let ledger = AuditLedger::with_block_threshold(config.ledger.block_threshold);
        let consent = ConsentStore::new(ledger.clone());
        let access = AccessControl::new(consent.clone(), ledger.clone());
        let genomic_storage = GenomicStorage::new();
        let evidence = EvidenceAccumulator::new();
        let theory = TheoryEngine::new(evidence.clone(), ledger.clone());
        let webhook = WebhookPipeline::new()
            .with_retry_unit(std::time::Duration::from_secs(config.webhook.retry_unit_secs));
        let cache = ResponseCache::new();
        let compliance = ComplianceRegistry::new();
        let upload = UploadCoordinator::new();

        tracing::info!("platform composed");

        Self {
            ledger,
            consent,
            access,
            genomic_storage,
            evidence,
            theory,
            webhook,
            cache,
            compliance,
            upload,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn user_data() -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("full_name".to_string(), json!("Jane Doe"));
        m.insert("date_of_birth".to_string(), json!("1990-01-01"));
        m.insert("email".to_string(), json!("jane@example.com"));
        m
    }

    #[test]
    fn default_platform_wires_every_component() {
        let platform = Platform::new();
        assert_eq!(platform.ledger.stats().total_entries, 1); // genesis
        assert_eq!(platform.consent.consent_stats().total, 0);
        assert_eq!(platform.compliance.list_assessments().len(), 1); // seeded template
    }

    #[test]
    fn consent_and_access_share_the_same_ledger() {
        let platform = Platform::new();
        platform
            .consent
            .capture("user_1", "genomic_analysis_v1", user_data(), "127.0.0.1", "ua", "sig")
            .unwrap();
        // the capture landed on the ledger handle shared with `access`
        assert!(platform.ledger.stats().total_entries >= 2);
    }

    #[test]
    fn custom_config_changes_ledger_block_threshold() {
        let config = PlatformConfig {
            ledger: config::LedgerConfig { block_threshold: 2 },
            ..PlatformConfig::default()
        };
        let platform = Platform::with_config(&config);
        for i in 0..3 {
            platform
                .consent
                .capture(&format!("user_{i}"), "genomic_analysis_v1", user_data(), "127.0.0.1", "ua", "sig")
                .unwrap();
        }
        assert!(platform.ledger.stats().total_blocks >= 1);
    }
}
