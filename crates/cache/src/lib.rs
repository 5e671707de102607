//! Keyed TTL response cache. A correctness-neutral accelerator in front of
//! read paths: nothing persists through it, and a reader racing a pattern
//! invalidation may observe a stale-but-soon-deleted entry.

pub mod model;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use platform_core::{canonical_json, sha256_hex};
use serde_json::Value;

pub use model::CacheStats;

struct Entry {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
}

struct State {
    /// Hashed key -> entry.
    entries: HashMap<String, Entry>,
    /// Hashed key -> the original `{endpoint, params}` string it was
    /// derived from, so `invalidate_pattern` can match on the readable
    /// form rather than the hash.
    original_keys: HashMap<String, String>,
    hits: u64,
    misses: u64,
}

/// Keyed TTL cache over `(endpoint, params)`. Cheaply cloneable; clones
/// share the same backing store.
#[derive(Clone)]
pub struct ResponseCache {
    state: Arc<Mutex<State>>,
}

fn cache_key(endpoint: &str, params: Option<&Value>) -> (String, String) {
    let original = canonical_json(&serde_json::json!({
        "endpoint": endpoint,
        "params": params.cloned().unwrap_or(Value::Null),
    }));
    let hashed = sha256_hex(&original);
    (original, hashed)
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                entries: HashMap::new(),
                original_keys: HashMap::new(),
                hits: 0,
                misses: 0,
            })),
        }
    }

    pub fn get(&self, endpoint: &str, params: Option<&Value>) -> Option<Value> {
        let (_, key) = cache_key(endpoint, params);
        let mut state = self.state.lock();
        match state.entries.get(&key) {
            Some(entry) => {
                if let Some(expires_at) = entry.expires_at {
                    if Utc::now() > expires_at {
                        state.entries.remove(&key);
                        state.original_keys.remove(&key);
                        state.misses += 1;
                        return None;
                    }
                }
                state.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    pub fn set(&self, endpoint: &str, data: Value, ttl_seconds: i64, params: Option<&Value>) {
        let (original, key) = cache_key(endpoint, params);
        let expires_at = if ttl_seconds > 0 {
            Some(Utc::now() + chrono::Duration::seconds(ttl_seconds))
        } else {
            None
        };
        let mut state = self.state.lock();
        state.entries.insert(key.clone(), Entry { value: data, expires_at });
        state.original_keys.insert(key, original);
    }

    pub fn delete(&self, endpoint: &str, params: Option<&Value>) {
        let (_, key) = cache_key(endpoint, params);
        let mut state = self.state.lock();
        state.entries.remove(&key);
        state.original_keys.remove(&key);
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.original_keys.clear();
        state.hits = 0;
        state.misses = 0;
    }

    /// Removes every key whose original `{endpoint, params}` string
    /// contains `pattern` as a substring.
    pub fn invalidate_pattern(&self, pattern: &str) {
        let mut state = self.state.lock();
        let matching: Vec<String> = state
            .original_keys
            .iter()
            .filter(|(_, original)| original.contains(pattern))
            .map(|(key, _)| key.clone())
            .collect();
        for key in matching {
            state.entries.remove(&key);
            state.original_keys.remove(&key);
        }
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let total = state.hits + state.misses;
        let hit_ratio = if total == 0 {
            0.0
        } else {
            (state.hits as f64 / total as f64 * 1000.0).round() / 1000.0
        };
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            hit_ratio,
            cached_items: state.entries.len(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn miss_then_hit() {
        let cache = ResponseCache::new();
        assert_eq!(cache.get("/genes/search", None), None);
        cache.set("/genes/search", json!({"results": []}), 300, None);
        assert_eq!(cache.get("/genes/search", None), Some(json!({"results": []})));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn ttl_zero_means_no_expiry() {
        let cache = ResponseCache::new();
        cache.set("/health", json!({"status": "ok"}), 0, None);
        assert!(cache.get("/health", None).is_some());
    }

    #[test]
    fn expired_entries_count_as_misses_and_are_evicted() {
        let cache = ResponseCache::new();
        cache.set("/genes/search", json!({"results": []}), -1, None);
        assert_eq!(cache.get("/genes/search", None), None);
        assert_eq!(cache.stats().cached_items, 0);
    }

    #[test]
    fn invalidate_pattern_removes_matching_keys_only() {
        let cache = ResponseCache::new();
        cache.set("/genes/BRCA1", json!(1), 300, None);
        cache.set("/genes/BRCA2", json!(2), 300, None);
        cache.set("/theories", json!(3), 300, None);

        cache.invalidate_pattern("/genes/");
        assert_eq!(cache.get("/genes/BRCA1", None), None);
        assert_eq!(cache.get("/genes/BRCA2", None), None);
        assert!(cache.get("/theories", None).is_some());
    }

    #[test]
    fn distinct_params_are_distinct_keys() {
        let cache = ResponseCache::new();
        let p1 = json!({"query": "BRCA"});
        let p2 = json!({"query": "SHANK3"});
        cache.set("/genes/search", json!("brca-results"), 300, Some(&p1));
        cache.set("/genes/search", json!("shank3-results"), 300, Some(&p2));
        assert_eq!(cache.get("/genes/search", Some(&p1)), Some(json!("brca-results")));
        assert_eq!(cache.get("/genes/search", Some(&p2)), Some(json!("shank3-results")));
    }

    #[test]
    fn clear_resets_stats_and_entries() {
        let cache = ResponseCache::new();
        cache.set("/health", json!(1), 300, None);
        cache.get("/health", None);
        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.cached_items, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }
}
