//! The seed partner registry.
//!
//! Three sequencing partners ship registered by default, mirroring the
//! reference deployment. A production rollout would load these from
//! configuration; the reference keeps them compiled in.

use std::collections::HashMap;

use crate::model::{EventType, WebhookPartner};

pub fn default_partners() -> HashMap<String, WebhookPartner> {
    let mut partners = HashMap::new();
    partners.insert(
        "illumina".to_string(),
        WebhookPartner {
            partner_id: "illumina".to_string(),
            name: "Illumina Inc.".to_string(),
            secret: "illumina_webhook_secret_key_2025".to_string(),
            active: true,
            supported_events: vec![EventType::SequencingComplete, EventType::QcComplete],
            webhook_url: Some("https://api.illumina.com/webhooks/dna-research".to_string()),
            timeout_seconds: 30,
            max_retries: 3,
        },
    );
    partners.insert(
        "oxford".to_string(),
        WebhookPartner {
            partner_id: "oxford".to_string(),
            name: "Oxford Nanopore Technologies".to_string(),
            secret: "oxford_webhook_secret_key_2025".to_string(),
            active: true,
            supported_events: vec![EventType::SequencingComplete, EventType::AnalysisComplete],
            webhook_url: Some("https://api.nanoporetech.com/webhooks/dna-research".to_string()),
            timeout_seconds: 30,
            max_retries: 3,
        },
    );
    partners.insert(
        "pacbio".to_string(),
        WebhookPartner {
            partner_id: "pacbio".to_string(),
            name: "Pacific Biosciences".to_string(),
            secret: "pacbio_webhook_secret_key_2025".to_string(),
            active: true,
            supported_events: vec![EventType::SequencingComplete, EventType::AnalysisComplete],
            webhook_url: Some("https://api.pacb.com/webhooks/dna-research".to_string()),
            timeout_seconds: 30,
            max_retries: 3,
        },
    );
    partners
}
