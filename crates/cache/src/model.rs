//! Cache statistics.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
    pub cached_items: usize,
}
