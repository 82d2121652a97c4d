//! Aggregate statistics reported by the cache facade.

use serde::{Deserialize, Serialize};

/// Statistics for the active backend.
///
/// On the remote path, key counts come from backend introspection and hit
/// counts from the metadata repository. On the fallback path only the
/// local map size is known; hit tracking is metadata-repository-only, so
/// `hit_count` reads zero there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of keys in the active backend.
    #[serde(rename = "totalKeys")]
    pub total_keys: u64,

    /// Human-readable memory figure from backend introspection, when the
    /// backend exposes one.
    #[serde(rename = "memoryUsage", skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<String>,

    /// Total recorded hits across all tracked keys.
    #[serde(rename = "hitCount")]
    pub hit_count: u64,

    /// Number of tracked entries.
    #[serde(rename = "totalEntries")]
    pub total_entries: u64,
}

/// Aggregate hit statistics from the metadata repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitStats {
    /// Sum of hit counters across all rows.
    #[serde(rename = "totalHits")]
    pub total_hits: u64,

    /// Number of metadata rows.
    #[serde(rename = "totalRows")]
    pub total_rows: u64,
}
