//! Ledger entries and blocks.

use platform_core::model::LedgerEntryType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: u64,
    pub entry_type: LedgerEntryType,
    pub user_id: String,
    pub timestamp: String,
    pub data_hash: String,
    pub previous_hash: String,
    /// Set once the entry is sealed into a block.
    pub block_hash: Option<String>,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub block_id: u64,
    pub timestamp: String,
    pub previous_block_hash: String,
    pub merkle_root: String,
    pub entries: Vec<LedgerEntry>,
    pub block_hash: String,
    /// Unused; present for wire-format stability.
    pub nonce: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_blocks: usize,
    pub total_entries: usize,
    pub pending_entries: usize,
    pub entries_by_type: Map<String, Value>,
    pub chain_integrity: bool,
}
