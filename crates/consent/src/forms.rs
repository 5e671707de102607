//! The two consent forms seeded at construction.

use platform_core::model::ConsentType;

use crate::model::ConsentForm;

pub fn default_forms() -> Vec<ConsentForm> {
    vec![
        ConsentForm {
            form_id: "genomic_analysis_v1".to_string(),
            version: "1.0".to_string(),
            title: "Genomic Analysis Consent".to_string(),
            description: "Consent to analyze your genomic data for research purposes".to_string(),
            consent_types: vec![
                ConsentType::GenomicAnalysis,
                ConsentType::ResearchParticipation,
            ],
            required_fields: vec![
                "full_name".to_string(),
                "date_of_birth".to_string(),
                "email".to_string(),
            ],
            consent_text: "I consent to the analysis of my genomic data for research purposes."
                .to_string(),
            validity_days: Some(365),
        },
        ConsentForm {
            form_id: "data_sharing_v1".to_string(),
            version: "1.0".to_string(),
            title: "Data Sharing Consent".to_string(),
            description: "Consent to share anonymized data with research partners".to_string(),
            consent_types: vec![ConsentType::DataSharing],
            required_fields: vec!["full_name".to_string(), "email".to_string()],
            consent_text: "I consent to sharing my anonymized genomic data with research partners."
                .to_string(),
            validity_days: Some(730),
        },
    ]
}
