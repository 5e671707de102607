//! File upload coordinator: issues signed, expiring upload tickets and
//! validates completion by checksum.

pub mod error;
pub mod model;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use platform_core::sha256_hex;
use sha2::Sha256;

pub use error::{Result, UploadError};
pub use model::{FileType, FileUpload, UploadStats, UploadStatus};

type HmacSha256 = Hmac<Sha256>;

/// Not a secret worth rotating carefully for this reference scope --
/// production deployments should source this from the environment.
const SIGNING_SECRET: &str = "secure_upload_secret_key_2025";
const BASE_URL: &str = "https://dnaresearch-uploads.s3.amazonaws.com";

struct State {
    uploads: std::collections::HashMap<String, FileUpload>,
}

/// Presigned upload tickets, keyed by `upload_id`.
#[derive(Clone)]
pub struct UploadCoordinator {
    state: Arc<Mutex<State>>,
}

impl UploadCoordinator {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State { uploads: std::collections::HashMap::new() })),
        }
    }

    pub fn create_presigned(
        &self,
        filename: &str,
        file_size: u64,
        file_type: &str,
        checksum: &str,
        user_id: &str,
        expires_in_hours: i64,
    ) -> Result<FileUpload> {
        let file_type = FileType::parse(file_type).ok_or_else(|| UploadError::UnsupportedFileType(file_type.to_string()))?;

        let lower = filename.to_lowercase();
        if !file_type.allowed_extensions().iter().any(|ext| lower.ends_with(ext)) {
            return Err(UploadError::InvalidExtension(file_type.as_str().to_string(), filename.to_string()));
        }
        if file_size > file_type.max_size() {
            return Err(UploadError::FileTooLarge {
                file_type: file_type.as_str().to_string(),
                max_mb: file_type.max_size() / (1024 * 1024),
            });
        }

        let upload_id = generate_upload_id(filename, user_id);
        let expires_at = Utc::now() + chrono::Duration::hours(expires_in_hours);
        let presigned_url = presigned_url(&upload_id, filename, expires_at);

        let upload = FileUpload {
            upload_id: upload_id.clone(),
            filename: filename.to_string(),
            file_type,
            file_size,
            checksum: checksum.to_string(),
            presigned_url,
            expires_at,
            status: UploadStatus::Pending,
            created_at: Utc::now(),
            user_id: user_id.to_string(),
        };
        self.state.lock().uploads.insert(upload_id, upload.clone());
        tracing::info!(upload_id = %upload.upload_id, filename, "presigned upload issued");
        Ok(upload)
    }

    /// `EXPIRED` if past `expires_at`; `FAILED` on checksum mismatch; else
    /// `COMPLETED`.
    pub fn complete(&self, upload_id: &str, actual_checksum: &str) -> Result<bool> {
        let mut state = self.state.lock();
        let upload = state
            .uploads
            .get_mut(upload_id)
            .ok_or_else(|| UploadError::NotFound(upload_id.to_string()))?;

        if Utc::now() > upload.expires_at {
            upload.status = UploadStatus::Expired;
            return Ok(false);
        }
        if upload.checksum != actual_checksum {
            upload.status = UploadStatus::Failed;
            return Ok(false);
        }
        upload.status = UploadStatus::Completed;
        Ok(true)
    }

    pub fn get(&self, upload_id: &str) -> Option<FileUpload> {
        self.state.lock().uploads.get(upload_id).cloned()
    }

    pub fn list_user_uploads(&self, user_id: &str, status: Option<UploadStatus>) -> Vec<FileUpload> {
        let state = self.state.lock();
        let mut uploads: Vec<FileUpload> = state
            .uploads
            .values()
            .filter(|u| u.user_id == user_id)
            .filter(|u| status.map(|s| s == u.status).unwrap_or(true))
            .cloned()
            .collect();
        uploads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        uploads
    }

    /// Marks every `PENDING` upload past its `expires_at` as `EXPIRED`.
    /// Returns the count transitioned.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut state = self.state.lock();
        let mut count = 0;
        for upload in state.uploads.values_mut() {
            if upload.status == UploadStatus::Pending && now > upload.expires_at {
                upload.status = UploadStatus::Expired;
                count += 1;
            }
        }
        count
    }

    pub fn stats(&self) -> UploadStats {
        let state = self.state.lock();
        let mut by_status: serde_json::Map<String, serde_json::Value> = serde_json::Map::new();
        let mut by_file_type: serde_json::Map<String, serde_json::Value> = serde_json::Map::new();
        let mut total_size_bytes: u64 = 0;
        for upload in state.uploads.values() {
            let status_key = format!("{:?}", upload.status).to_lowercase();
            let count = by_status.get(&status_key).and_then(serde_json::Value::as_u64).unwrap_or(0);
            by_status.insert(status_key, serde_json::json!(count + 1));

            let type_key = upload.file_type.as_str().to_string();
            let count = by_file_type.get(&type_key).and_then(serde_json::Value::as_u64).unwrap_or(0);
            by_file_type.insert(type_key, serde_json::json!(count + 1));

            if upload.status == UploadStatus::Completed {
                total_size_bytes += upload.file_size;
            }
        }
        UploadStats {
            total_uploads: state.uploads.len(),
            by_status,
            by_file_type,
            total_size_bytes,
            total_size_mb: (total_size_bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0,
        }
    }
}

impl Default for UploadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_upload_id(filename: &str, user_id: &str) -> String {
    let unique = uuid::Uuid::new_v4();
    let timestamp = Utc::now().timestamp_micros();
    let data = format!("{filename}_{user_id}_{timestamp}_{unique}");
    sha256_hex(data)[..16].to_string()
}

fn presigned_url(upload_id: &str, filename: &str, expires_at: DateTime<Utc>) -> String {
    let expires = expires_at.timestamp();
    let string_to_sign = format!("PUT\n{upload_id}\n{filename}\n{expires}");
    let mut mac = HmacSha256::new_from_slice(SIGNING_SECRET.as_bytes()).expect("hmac accepts any key length");
    mac.update(string_to_sign.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("{BASE_URL}/{upload_id}/{filename}?expires={expires}&signature={signature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_presigned_rejects_unsupported_type() {
        let coordinator = UploadCoordinator::new();
        let err = coordinator
            .create_presigned("sample.txt", 100, "txt", "abc", "user_1", 24)
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFileType(_)));
    }

    #[test]
    fn create_presigned_rejects_mismatched_extension() {
        let coordinator = UploadCoordinator::new();
        let err = coordinator
            .create_presigned("sample.bam", 100, "vcf", "abc", "user_1", 24)
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidExtension(_, _)));
    }

    #[test]
    fn create_presigned_rejects_oversized_file() {
        let coordinator = UploadCoordinator::new();
        let err = coordinator
            .create_presigned("sample.vcf", 200 * 1024 * 1024, "vcf", "abc", "user_1", 24)
            .unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { .. }));
    }

    #[test]
    fn create_presigned_succeeds_and_embeds_signature() {
        let coordinator = UploadCoordinator::new();
        let upload = coordinator
            .create_presigned("sample.vcf", 1024, "vcf", "checksum123", "user_1", 24)
            .unwrap();
        assert_eq!(upload.upload_id.len(), 16);
        assert!(upload.presigned_url.contains("signature="));
        assert_eq!(upload.status, UploadStatus::Pending);
    }

    #[test]
    fn complete_fails_on_checksum_mismatch() {
        let coordinator = UploadCoordinator::new();
        let upload = coordinator
            .create_presigned("sample.vcf", 1024, "vcf", "checksum123", "user_1", 24)
            .unwrap();
        let ok = coordinator.complete(&upload.upload_id, "wrong").unwrap();
        assert!(!ok);
        assert_eq!(coordinator.get(&upload.upload_id).unwrap().status, UploadStatus::Failed);
    }

    #[test]
    fn complete_succeeds_on_matching_checksum() {
        let coordinator = UploadCoordinator::new();
        let upload = coordinator
            .create_presigned("sample.vcf", 1024, "vcf", "checksum123", "user_1", 24)
            .unwrap();
        let ok = coordinator.complete(&upload.upload_id, "checksum123").unwrap();
        assert!(ok);
        assert_eq!(coordinator.get(&upload.upload_id).unwrap().status, UploadStatus::Completed);
    }

    #[test]
    fn complete_reports_expired_past_deadline() {
        let coordinator = UploadCoordinator::new();
        let upload = coordinator
            .create_presigned("sample.vcf", 1024, "vcf", "checksum123", "user_1", -1)
            .unwrap();
        let ok = coordinator.complete(&upload.upload_id, "checksum123").unwrap();
        assert!(!ok);
        assert_eq!(coordinator.get(&upload.upload_id).unwrap().status, UploadStatus::Expired);
    }

    #[test]
    fn cleanup_expired_sweeps_only_pending_past_expiry() {
        let coordinator = UploadCoordinator::new();
        coordinator
            .create_presigned("sample.vcf", 1024, "vcf", "checksum123", "user_1", -1)
            .unwrap();
        coordinator
            .create_presigned("sample2.vcf", 1024, "vcf", "checksum123", "user_1", 24)
            .unwrap();
        assert_eq!(coordinator.cleanup_expired(), 1);
    }
}
