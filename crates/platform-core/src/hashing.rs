//! Canonical JSON serialization and content hashing.
//!
//! Mirrors `json.dumps(..., sort_keys=True)` from the original
//! implementation: every object's keys are emitted in sorted order so the
//! same logical payload always hashes to the same bytes, regardless of
//! insertion order.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Serialize `value` with object keys sorted at every nesting level.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key).unwrap_or_default());
                out.push(':');
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

/// SHA-256 of arbitrary bytes, lowercase hex.
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_ref());
    hex::encode(hasher.finalize())
}

/// SHA-256 of a value's canonical JSON form.
pub fn hash_value(value: &Value) -> String {
    sha256_hex(canonical_json(value))
}

/// 64 zero hex characters — the genesis block's `previous_block_hash` and
/// the empty-entry-list Merkle root.
pub fn zero_hash() -> String {
    "0".repeat(64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_json_sorts_keys() {
        let a = canonical_json(&json!({"b": 1, "a": 2}));
        let b = canonical_json(&json!({"a": 2, "b": 1}));
        assert_eq!(a, b);
        assert_eq!(a, r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn canonical_json_sorts_nested_keys() {
        let value = canonical_json(&json!({"z": {"y": 1, "x": 2}}));
        assert_eq!(value, r#"{"z":{"x":2,"y":1}}"#);
    }

    #[test]
    fn sha256_hex_is_deterministic() {
        assert_eq!(sha256_hex("abc"), sha256_hex("abc"));
        assert_ne!(sha256_hex("abc"), sha256_hex("abd"));
    }

    #[test]
    fn zero_hash_is_64_zero_chars() {
        assert_eq!(zero_hash().len(), 64);
        assert!(zero_hash().chars().all(|c| c == '0'));
    }

    #[test]
    fn hash_value_is_order_independent() {
        assert_eq!(
            hash_value(&json!({"b": 1, "a": 2})),
            hash_value(&json!({"a": 2, "b": 1}))
        );
    }
}
