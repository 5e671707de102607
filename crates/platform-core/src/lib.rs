//! Shared types for the genomic consent platform.
//!
//! Every component crate depends on this one for the closed enums in the
//! data model, the cross-cutting error taxonomy, and canonical hashing.

pub mod error;
pub mod hashing;
pub mod model;
pub mod time;

pub use error::{ErrorKind, PlatformError, Result};
pub use hashing::{canonical_json, hash_value, sha256_hex, zero_hash};
pub use model::{Action, ConsentType, LedgerEntryType};
pub use time::now_rfc3339;
