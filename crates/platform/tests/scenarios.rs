//! Cross-component scenarios driven through one `Platform` handle, the way
//! an external adapter would call it.

use platform::Platform;
use platform_core::model::Action;
use serde_json::{json, Map, Value};

fn user_data() -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("full_name".to_string(), json!("Jane Doe"));
    m.insert("date_of_birth".to_string(), json!("1990-01-01"));
    m.insert("email".to_string(), json!("jane@example.com"));
    m
}

#[test]
fn access_granted_after_consent() {
    let platform = Platform::new();
    platform
        .consent
        .capture("user_001", "genomic_analysis_v1", user_data(), "127.0.0.1", "ua", "sig")
        .unwrap();

    let result = platform.access.check(access::AccessRequest {
        user_id: "user_001",
        action: Action::AnalyzeVariants,
        resource_id: "/genes/BRCA1/interpret",
        ip_address: "127.0.0.1",
    });

    assert!(result.granted);
    assert_eq!(result.reason, "All required consents valid");
    assert_eq!(platform.access.access_log(Some("user_001"), 10).len(), 1);

    let stats = platform.ledger.stats();
    assert!(stats.entries_by_type.contains_key("consent_granted"));
    assert!(stats.entries_by_type.contains_key("data_access"));
}

#[test]
fn access_denied_without_consent() {
    let platform = Platform::new();

    let result = platform.access.check(access::AccessRequest {
        user_id: "user_002",
        action: Action::AnalyzeVariants,
        resource_id: "/genes/BRCA1/interpret",
        ip_address: "127.0.0.1",
    });

    assert!(!result.granted);
    assert!(result.reason.contains("genomic_analysis"));
}

#[test]
fn upload_and_genomic_storage_are_independent_of_consent_state() {
    let platform = Platform::new();

    let upload = platform
        .upload
        .create_presigned("sample.vcf", 1024, "vcf", "checksum123", "user_003", 24)
        .unwrap();
    assert_eq!(upload.status, upload::UploadStatus::Pending);

    let vcf = "#V\n1\t3\t.\tA\tT\t60\tPASS\n1\t5\t.\tG\tC\t55\tPASS";
    let stored = platform.genomic_storage.process_genomic_data("p1", vcf, "GRCh38");
    assert_eq!(stored.total_variants, 2);
}
