//! Content-addressed anchor sequences and per-individual variant diffs.

pub mod error;
pub mod model;
pub mod vcf;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use platform_core::sha256_hex;
use uuid::Uuid;

pub use error::{Result, StorageError};
pub use model::{AnchorSequence, GenomicDataSummary, GenomicDifference, VcfVariant};
pub use vcf::parse_vcf;

const DEFAULT_ANCHOR_QUALITY: f64 = 0.95;
/// Fixed reference-sequence stub used until real reference-genome lookup
/// is wired in; length matches the S3 scenario (400bp).
const REFERENCE_STUB_UNIT: &str = "ATCG";
const REFERENCE_STUB_REPEATS: usize = 100;

struct State {
    anchors_by_hash: HashMap<String, String>,
    anchors: HashMap<String, AnchorSequence>,
    /// Keyed by anchor_id, then individual_id.
    diffs: HashMap<String, HashMap<String, Vec<GenomicDifference>>>,
}

#[derive(Clone)]
pub struct GenomicStorage {
    state: Arc<Mutex<State>>,
}

impl GenomicStorage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                anchors_by_hash: HashMap::new(),
                anchors: HashMap::new(),
                diffs: HashMap::new(),
            })),
        }
    }

    /// De-duplicates by `sequence_hash`: a repeat call with the same
    /// sequence increments `usage_count` on the existing anchor instead of
    /// creating a new one.
    pub fn create_anchor(&self, sequence: &str, reference_genome: &str) -> AnchorSequence {
        let sequence_hash = sha256_hex(sequence);
        let mut state = self.state.lock();
        if let Some(anchor_id) = state.anchors_by_hash.get(&sequence_hash).cloned() {
            let anchor = state.anchors.get_mut(&anchor_id).expect("indexed anchor exists");
            anchor.usage_count += 1;
            return anchor.clone();
        }
        let anchor = AnchorSequence {
            anchor_id: Uuid::new_v4().to_string(),
            sequence_hash: sequence_hash.clone(),
            reference_genome: reference_genome.to_string(),
            quality_score: DEFAULT_ANCHOR_QUALITY,
            usage_count: 1,
            created_at: Utc::now(),
        };
        state.anchors_by_hash.insert(sequence_hash, anchor.anchor_id.clone());
        state.anchors.insert(anchor.anchor_id.clone(), anchor.clone());
        tracing::debug!(anchor_id = %anchor.anchor_id, "anchor created");
        anchor
    }

    pub fn get_anchor(&self, anchor_id: &str) -> Option<AnchorSequence> {
        self.state.lock().anchors.get(anchor_id).cloned()
    }

    pub fn store_differences(
        &self,
        anchor_id: &str,
        individual_id: &str,
        variants: &[VcfVariant],
    ) -> Result<Vec<GenomicDifference>> {
        let mut state = self.state.lock();
        if !state.anchors.contains_key(anchor_id) {
            return Err(StorageError::AnchorNotFound(anchor_id.to_string()));
        }
        let now = Utc::now();
        let diffs: Vec<GenomicDifference> = variants
            .iter()
            .map(|v| GenomicDifference {
                diff_id: Uuid::new_v4().to_string(),
                anchor_id: anchor_id.to_string(),
                individual_id: individual_id.to_string(),
                position: v.position,
                reference_allele: v.reference_allele.clone(),
                alternate_allele: v.alternate_allele.clone(),
                quality_score: v.quality_score,
                created_at: now,
            })
            .collect();

        state
            .diffs
            .entry(anchor_id.to_string())
            .or_default()
            .entry(individual_id.to_string())
            .or_default()
            .extend(diffs.clone());
        Ok(diffs)
    }

    pub fn differences_for(&self, anchor_id: &str, individual_id: &str) -> Vec<GenomicDifference> {
        self.state
            .lock()
            .diffs
            .get(anchor_id)
            .and_then(|by_individual| by_individual.get(individual_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Reconstructs `individual_id`'s sequence for `anchor_id` by applying
    /// every single-base substitution (`|ref|==|alt|==1`) to the reference
    /// stub, in descending position order. Indels are left unapplied — see
    /// DESIGN.md's Open Question decision.
    pub fn materialize(&self, individual_id: &str, anchor_id: &str) -> Result<String> {
        if self.get_anchor(anchor_id).is_none() {
            return Err(StorageError::AnchorNotFound(anchor_id.to_string()));
        }
        let mut sequence: Vec<char> = reference_stub().chars().collect();
        let mut diffs = self.differences_for(anchor_id, individual_id);
        diffs.sort_by(|a, b| b.position.cmp(&a.position));

        for diff in &diffs {
            if diff.reference_allele.chars().count() != 1 || diff.alternate_allele.chars().count() != 1 {
                continue;
            }
            let idx = (diff.position - 1) as usize;
            if idx < sequence.len() {
                sequence[idx] = diff.alternate_allele.chars().next().expect("checked len == 1");
            }
        }
        Ok(sequence.into_iter().collect())
    }

    /// Runs `create_anchor` + `parse_vcf` + `store_differences` as one
    /// pipeline, reporting a diagnostic storage-efficiency summary.
    pub fn process_genomic_data(
        &self,
        individual_id: &str,
        vcf_text: &str,
        reference_genome: &str,
    ) -> GenomicDataSummary {
        let anchor_text: String = vcf_text.chars().take(1000).collect();
        let anchor = self.create_anchor(&anchor_text, reference_genome);
        let variants = parse_vcf(vcf_text);
        let diffs = self
            .store_differences(&anchor.anchor_id, individual_id, &variants)
            .expect("anchor was just created");

        let original_size = vcf_text.len().max(1);
        let compressed_size = anchor.sequence_hash.len()
            + diffs
                .iter()
                .map(|d| serde_json::to_string(d).map(|s| s.len()).unwrap_or(0))
                .sum::<usize>();
        let compressed_size = compressed_size.max(1);

        GenomicDataSummary {
            individual_id: individual_id.to_string(),
            anchor_id: anchor.anchor_id,
            total_variants: diffs.len(),
            storage_size_mb: compressed_size as f64 / (1024.0 * 1024.0),
            compression_ratio: original_size as f64 / compressed_size as f64,
        }
    }
}

impl Default for GenomicStorage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn reference_stub() -> String {
    REFERENCE_STUB_UNIT.repeat(REFERENCE_STUB_REPEATS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_dedup_increments_usage_count() {
        let store = GenomicStorage::new();
        let a1 = store.create_anchor("ACGT", "GRCh38");
        let a2 = store.create_anchor("ACGT", "GRCh38");
        assert_eq!(a1.anchor_id, a2.anchor_id);
        assert_eq!(a2.usage_count, 2);
    }

    #[test]
    fn distinct_sequences_yield_distinct_anchors() {
        let store = GenomicStorage::new();
        let a1 = store.create_anchor("ACGT", "GRCh38");
        let a2 = store.create_anchor("TTTT", "GRCh38");
        assert_ne!(a1.anchor_id, a2.anchor_id);
    }

    #[test]
    fn s3_anchor_diff_round_trip() {
        let store = GenomicStorage::new();
        let vcf = "#V\n1\t3\t.\tA\tT\t60\tPASS\n1\t5\t.\tG\tC\t55\tPASS";
        let anchor = store.create_anchor(vcf, "GRCh38");
        let variants = parse_vcf(vcf);
        assert_eq!(variants.len(), 2);
        let diffs = store
            .store_differences(&anchor.anchor_id, "p1", &variants)
            .unwrap();
        assert_eq!(diffs.len(), 2);

        let sequence = store.materialize("p1", &anchor.anchor_id).unwrap();
        assert_eq!(sequence.len(), 400);
        let chars: Vec<char> = sequence.chars().collect();
        assert_eq!(chars[2], 'T');
        assert_eq!(chars[4], 'C');
    }

    #[test]
    fn materialize_fails_on_unknown_anchor() {
        let store = GenomicStorage::new();
        let err = store.materialize("p1", "nonexistent").unwrap_err();
        assert!(matches!(err, StorageError::AnchorNotFound(_)));
    }

    #[test]
    fn materialize_skips_non_snv_diffs() {
        let store = GenomicStorage::new();
        let anchor = store.create_anchor("anything", "GRCh38");
        let variants = vec![VcfVariant {
            chromosome: "1".to_string(),
            position: 1,
            reference_allele: "AG".to_string(),
            alternate_allele: "A".to_string(),
            quality_score: 0.9,
        }];
        store
            .store_differences(&anchor.anchor_id, "p1", &variants)
            .unwrap();
        let sequence = store.materialize("p1", &anchor.anchor_id).unwrap();
        assert_eq!(sequence, reference_stub());
    }
}
