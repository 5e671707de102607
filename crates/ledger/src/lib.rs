//! Append-only, hash-chained audit ledger.
//!
//! A single writer lane serializes every `append`; readers observe a
//! consistent snapshot of sealed blocks plus the pending buffer. See
//! `merkle` for block sealing and `model` for the wire types.

pub mod error;
pub mod merkle;
pub mod model;

use std::sync::Arc;

use parking_lot::Mutex;
use platform_core::model::LedgerEntryType;
use platform_core::{canonical_json, now_rfc3339, sha256_hex, zero_hash};
use serde_json::{json, Map, Value};

pub use error::{LedgerError, Result};
pub use model::{Block, LedgerEntry, LedgerStats};

/// Entries accumulated before a block is automatically sealed.
const DEFAULT_BLOCK_THRESHOLD: usize = 10;

struct State {
    blocks: Vec<Block>,
    pending: Vec<LedgerEntry>,
    next_entry_id: u64,
}

impl State {
    fn genesis() -> Block {
        let timestamp = now_rfc3339();
        let merkle_root = zero_hash();
        let previous_block_hash = zero_hash();
        let block_hash = block_hash(0, &timestamp, &previous_block_hash, &merkle_root, 0);
        Block {
            block_id: 0,
            timestamp,
            previous_block_hash,
            merkle_root,
            entries: Vec::new(),
            block_hash,
            nonce: 0,
        }
    }

    fn tip_hash(&self) -> String {
        self.blocks
            .last()
            .map(|b| b.block_hash.clone())
            .unwrap_or_else(zero_hash)
    }

    fn seal_pending(&mut self) -> Option<u64> {
        if self.pending.is_empty() {
            return None;
        }
        let entries: Vec<LedgerEntry> = self.pending.drain(..).collect();
        let merkle_root = merkle::merkle_root(entries.iter().map(|e| e.data_hash.clone()));
        let block_id = self.blocks.len() as u64;
        let timestamp = now_rfc3339();
        let previous_block_hash = self.tip_hash();
        let nonce = 0;
        let hash = block_hash(block_id, &timestamp, &previous_block_hash, &merkle_root, nonce);

        let sealed_entries: Vec<LedgerEntry> = entries
            .into_iter()
            .map(|mut e| {
                e.block_hash = Some(hash.clone());
                e
            })
            .collect();

        self.blocks.push(Block {
            block_id,
            timestamp,
            previous_block_hash,
            merkle_root,
            entries: sealed_entries,
            block_hash: hash,
            nonce,
        });
        Some(block_id)
    }
}

fn block_hash(
    block_id: u64,
    timestamp: &str,
    previous_block_hash: &str,
    merkle_root: &str,
    nonce: u64,
) -> String {
    let payload = json!({
        "block_id": block_id,
        "timestamp": timestamp,
        "previous_block_hash": previous_block_hash,
        "merkle_root": merkle_root,
        "nonce": nonce,
    });
    sha256_hex(canonical_json(&payload))
}

/// Append-only audit ledger. Cheaply cloneable; every clone shares the same
/// underlying state via `Arc`.
#[derive(Clone)]
pub struct AuditLedger {
    state: Arc<Mutex<State>>,
    block_threshold: usize,
}

impl AuditLedger {
    pub fn new() -> Self {
        Self::with_block_threshold(DEFAULT_BLOCK_THRESHOLD)
    }

    pub fn with_block_threshold(block_threshold: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                blocks: vec![State::genesis()],
                pending: Vec::new(),
                next_entry_id: 0,
            })),
            block_threshold,
        }
    }

    /// Append a new entry. Canonicalizes `payload`, hashes it, and seals a
    /// block automatically once the pending buffer reaches the threshold.
    pub fn append(
        &self,
        entry_type: LedgerEntryType,
        user_id: &str,
        payload: &Value,
        metadata: Map<String, Value>,
    ) -> u64 {
        let data_hash = sha256_hex(canonical_json(payload));
        let mut state = self.state.lock();
        let entry_id = state.next_entry_id;
        state.next_entry_id += 1;
        let previous_hash = state.tip_hash();

        let entry = LedgerEntry {
            entry_id,
            entry_type,
            user_id: user_id.to_string(),
            timestamp: now_rfc3339(),
            data_hash,
            previous_hash,
            block_hash: None,
            metadata,
        };
        tracing::debug!(entry_id, %entry_type, user_id, "ledger entry appended");
        state.pending.push(entry);

        if state.pending.len() >= self.block_threshold {
            if let Some(block_id) = state.seal_pending() {
                tracing::info!(block_id, "ledger block sealed");
            }
        }
        entry_id
    }

    /// Seal whatever is pending. No-op (returns `None`) if nothing is
    /// pending.
    pub fn force_commit(&self) -> Option<u64> {
        let mut state = self.state.lock();
        state.seal_pending()
    }

    pub fn get_entry(&self, entry_id: u64) -> Option<LedgerEntry> {
        let state = self.state.lock();
        state
            .pending
            .iter()
            .find(|e| e.entry_id == entry_id)
            .cloned()
            .or_else(|| {
                state
                    .blocks
                    .iter()
                    .flat_map(|b| b.entries.iter())
                    .find(|e| e.entry_id == entry_id)
                    .cloned()
            })
    }

    /// All entries for `user_id`, pending and sealed, newest-first.
    pub fn audit_trail(&self, user_id: &str) -> Vec<LedgerEntry> {
        let state = self.state.lock();
        let mut entries: Vec<LedgerEntry> = state
            .blocks
            .iter()
            .flat_map(|b| b.entries.iter())
            .chain(state.pending.iter())
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Recomputes every sealed block's hash and Merkle root and checks the
    /// chain links. No self-repair is attempted on failure.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock();
        for i in 1..state.blocks.len() {
            let block = &state.blocks[i];
            let previous = &state.blocks[i - 1];
            if block.previous_block_hash != previous.block_hash {
                return false;
            }
            let recomputed_merkle =
                merkle::merkle_root(block.entries.iter().map(|e| e.data_hash.clone()));
            if block.merkle_root != recomputed_merkle {
                return false;
            }
            let recomputed_hash = block_hash(
                block.block_id,
                &block.timestamp,
                &block.previous_block_hash,
                &block.merkle_root,
                block.nonce,
            );
            if block.block_hash != recomputed_hash {
                return false;
            }
        }
        true
    }

    pub fn stats(&self) -> LedgerStats {
        let state = self.state.lock();
        let sealed_entries: Vec<&LedgerEntry> =
            state.blocks.iter().flat_map(|b| b.entries.iter()).collect();
        let mut entries_by_type: Map<String, Value> = Map::new();
        for entry in sealed_entries.iter().chain(state.pending.iter()) {
            let key = entry.entry_type.as_str().to_string();
            let count = entries_by_type.get(&key).and_then(Value::as_u64).unwrap_or(0);
            entries_by_type.insert(key, json!(count + 1));
        }
        drop(state);
        let chain_integrity = self.verify_integrity();
        let state = self.state.lock();
        LedgerStats {
            total_blocks: state.blocks.len(),
            total_entries: sealed_entries.len() + state.pending.len(),
            pending_entries: state.pending.len(),
            entries_by_type,
            chain_integrity,
        }
    }

    /// Access to sealed blocks, for diagnostics and tests.
    pub fn blocks(&self) -> Vec<Block> {
        self.state.lock().blocks.clone()
    }
}

impl Default for AuditLedger {
    fn default() -> Self {
        Self::new()
    }
}
