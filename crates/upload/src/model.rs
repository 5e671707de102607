//! Upload tickets and the file types/sizes they're gated by.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Vcf,
    Fastq,
    Bam,
    Cram,
}

impl FileType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "vcf" => Some(FileType::Vcf),
            "fastq" => Some(FileType::Fastq),
            "bam" => Some(FileType::Bam),
            "cram" => Some(FileType::Cram),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Vcf => "vcf",
            FileType::Fastq => "fastq",
            FileType::Bam => "bam",
            FileType::Cram => "cram",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Vcf => &[".vcf", ".vcf.gz"],
            FileType::Fastq => &[".fastq", ".fastq.gz", ".fq", ".fq.gz"],
            FileType::Bam => &[".bam"],
            FileType::Cram => &[".cram"],
        }
    }

    /// Bytes.
    pub fn max_size(&self) -> u64 {
        const MIB: u64 = 1024 * 1024;
        const GIB: u64 = 1024 * MIB;
        match self {
            FileType::Vcf => 100 * MIB,
            FileType::Fastq => 10 * GIB,
            FileType::Bam => 5 * GIB,
            FileType::Cram => 2 * GIB,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpload {
    pub upload_id: String,
    pub filename: String,
    pub file_type: FileType,
    pub file_size: u64,
    pub checksum: String,
    pub presigned_url: String,
    pub expires_at: DateTime<Utc>,
    pub status: UploadStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadStats {
    pub total_uploads: usize,
    pub by_status: serde_json::Map<String, serde_json::Value>,
    pub by_file_type: serde_json::Map<String, serde_json::Value>,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
}
