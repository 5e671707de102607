//! Per-`EventType` processing. Each handler mutates the event's `data` map
//! in place with whatever downstream step the event feeds into.

use platform_core::now_rfc3339;
use serde_json::{json, Value};

use crate::error::{Result, WebhookError};
use crate::model::{EventType, WebhookEvent};

pub fn dispatch(event: &mut WebhookEvent) -> Result<()> {
    match event.event_type {
        EventType::SequencingComplete => sequencing_complete(event),
        EventType::QcComplete => qc_complete(event),
        EventType::AnalysisComplete => analysis_complete(event),
        EventType::UploadComplete => upload_complete(event),
        EventType::ErrorNotification => error_notification(event),
    }
}

fn sequencing_complete(event: &mut WebhookEvent) -> Result<()> {
    let sample_id = event.data.get("sample_id").and_then(Value::as_str);
    if sample_id.is_none() || sample_id == Some("") {
        return Err(WebhookError::Validation(
            "Missing required field: sample_id".to_string(),
        ));
    }
    let file_urls: Vec<Value> = event
        .data
        .get("file_urls")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let processed_at = now_rfc3339();
    let processed_files: Vec<Value> = file_urls
        .iter()
        .map(|url| {
            json!({
                "url": url,
                "processed_at": processed_at,
                "status": "ready_for_analysis",
            })
        })
        .collect();

    event
        .data
        .insert("processed_files".to_string(), json!(processed_files));
    event
        .data
        .insert("file_count".to_string(), json!(file_urls.len()));
    event
        .data
        .insert("processing_completed_at".to_string(), json!(processed_at));
    event
        .data
        .insert("next_step".to_string(), json!("quality_control"));
    Ok(())
}

fn qc_complete(event: &mut WebhookEvent) -> Result<()> {
    let empty = serde_json::Map::new();
    let qc_metrics = event
        .data
        .get("qc_metrics")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or(empty);
    let quality_score = qc_metrics.get("quality_score").cloned().unwrap_or(json!(0));
    let coverage = qc_metrics.get("coverage").cloned().unwrap_or(json!("0x"));
    let passed = qc_metrics
        .get("passed")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let next_step = if passed { "variant_calling" } else { "resequencing_required" };

    event.data.insert("qc_passed".to_string(), json!(passed));
    event.data.insert(
        "quality_assessment".to_string(),
        json!({
            "score": quality_score,
            "coverage": coverage,
            "recommendation": if passed { "proceed" } else { "review_required" },
        }),
    );
    event
        .data
        .insert("qc_processed_at".to_string(), json!(now_rfc3339()));
    event.data.insert("next_step".to_string(), json!(next_step));
    Ok(())
}

fn analysis_complete(event: &mut WebhookEvent) -> Result<()> {
    let empty = serde_json::Map::new();
    let results = event
        .data
        .get("analysis_results")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or(empty);
    let variant_count = results.get("variant_count").and_then(Value::as_u64).unwrap_or(0);
    let analysis_type = results
        .get("analysis_type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let reference = results
        .get("reference")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let analysis_quality = if variant_count > 1000 { "high" } else { "standard" };

    event
        .data
        .insert("variants_found".to_string(), json!(variant_count));
    event.data.insert(
        "analysis_summary".to_string(),
        json!({
            "type": analysis_type,
            "reference_genome": reference,
            "variant_count": variant_count,
            "analysis_quality": analysis_quality,
        }),
    );
    event
        .data
        .insert("analysis_processed_at".to_string(), json!(now_rfc3339()));
    event
        .data
        .insert("next_step".to_string(), json!("report_generation"));
    Ok(())
}

fn upload_complete(event: &mut WebhookEvent) -> Result<()> {
    let empty = serde_json::Map::new();
    let file_info = event
        .data
        .get("file_info")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or(empty);
    let size_mb = file_info.get("size_mb").cloned().unwrap_or(json!(0));
    let checksum_valid = file_info
        .get("checksum_valid")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    event.data.insert("upload_verified".to_string(), json!(true));
    event.data.insert("file_size_mb".to_string(), size_mb);
    event
        .data
        .insert("checksum_verified".to_string(), json!(checksum_valid));
    event
        .data
        .insert("upload_processed_at".to_string(), json!(now_rfc3339()));
    event
        .data
        .insert("next_step".to_string(), json!("file_processing"));
    Ok(())
}

fn error_notification(event: &mut WebhookEvent) -> Result<()> {
    let empty = serde_json::Map::new();
    let error_info = event
        .data
        .get("error")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or(empty);
    let severity = error_info
        .get("severity")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let code = error_info
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let requires_attention = matches!(severity.as_str(), "high" | "critical");

    event.data.insert("error_processed".to_string(), json!(true));
    event
        .data
        .insert("error_severity".to_string(), json!(severity));
    event.data.insert("error_code".to_string(), json!(code));
    event
        .data
        .insert("error_processed_at".to_string(), json!(now_rfc3339()));
    event
        .data
        .insert("requires_attention".to_string(), json!(requires_attention));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(event_type: EventType, data: Value) -> WebhookEvent {
        WebhookEvent {
            event_id: "e1".to_string(),
            partner_id: "illumina".to_string(),
            event_type,
            data: data.as_object().cloned().unwrap_or_default(),
            timestamp: now_rfc3339(),
            status: crate::model::WebhookStatus::Received,
            signature: None,
            retry_count: 0,
            max_retries: 3,
            next_retry: None,
            error_message: None,
            processed_at: None,
        }
    }

    #[test]
    fn sequencing_complete_requires_sample_id() {
        let mut ev = event(EventType::SequencingComplete, json!({}));
        assert!(dispatch(&mut ev).is_err());
    }

    #[test]
    fn sequencing_complete_sets_next_step() {
        let mut ev = event(
            EventType::SequencingComplete,
            json!({"sample_id": "s1", "file_urls": ["a", "b"]}),
        );
        dispatch(&mut ev).unwrap();
        assert_eq!(ev.data.get("next_step").unwrap(), "quality_control");
        assert_eq!(ev.data.get("file_count").unwrap(), &json!(2));
    }

    #[test]
    fn qc_complete_routes_on_passed() {
        let mut ev = event(
            EventType::QcComplete,
            json!({"qc_metrics": {"passed": false, "quality_score": 12, "coverage": "5x"}}),
        );
        dispatch(&mut ev).unwrap();
        assert_eq!(ev.data.get("next_step").unwrap(), "resequencing_required");
    }

    #[test]
    fn analysis_complete_classifies_quality() {
        let mut ev = event(
            EventType::AnalysisComplete,
            json!({"analysis_results": {"variant_count": 5000}}),
        );
        dispatch(&mut ev).unwrap();
        let summary = ev.data.get("analysis_summary").unwrap();
        assert_eq!(summary.get("analysis_quality").unwrap(), "high");
    }

    #[test]
    fn error_notification_flags_high_severity() {
        let mut ev = event(
            EventType::ErrorNotification,
            json!({"error": {"severity": "high", "code": "E1"}}),
        );
        dispatch(&mut ev).unwrap();
        assert_eq!(ev.data.get("requires_attention").unwrap(), &json!(true));
    }
}
