//! The in-process fallback map and its expiry sweeper.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

use tagcache_core::CacheEntry;

/// How often the background sweeper evicts expired entries.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// In-process store serving cache traffic when the remote backend is
/// unset or unreachable.
///
/// The map is the only mutable state owned by the caching layer. Reads
/// apply lazy expiry at access time, so staleness is bounded by the
/// smaller of "time since last sweep" and "time since last read".
/// Entries move `Live` → `Expired` → `Removed`; a `set` on the same key
/// writes a fresh envelope rather than resurrecting an old one.
#[derive(Debug, Default)]
pub struct FallbackStore {
    entries: DashMap<String, CacheEntry>,
}

impl FallbackStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the live entry for `key`, removing it if it has expired
    /// but has not been swept yet.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Some(entry.clone());
            }
            // Remove expired entry
            drop(entry);
            self.entries.remove(key);
        }
        None
    }

    /// Inserts an envelope, replacing any previous entry for `key`.
    pub fn insert(&self, key: &str, entry: CacheEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    /// Removes `key`, reporting whether an entry was actually present.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Returns `true` if a live entry exists for `key`. An expired entry
    /// is treated as absent and removed.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes every entry whose tag set intersects `tags` and returns
    /// the number removed. Matching is "any-of".
    pub fn invalidate_by_tags(&self, tags: &[String]) -> u64 {
        if tags.is_empty() {
            return 0;
        }

        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().matches_any_tag(tags))
            .map(|e| e.key().clone())
            .collect();

        let mut removed = 0;
        for key in matching {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed = removed, "invalidated fallback entries by tag");
        }
        removed
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of live (non-expired) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.value().is_expired())
            .count()
    }

    /// Returns `true` if no live entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evicts every expired entry and returns the number removed.
    ///
    /// An entry re-set concurrently between the scan and the removal is
    /// left alone; only entries still expired at removal time go.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().is_expired_at(now))
            .map(|e| e.key().clone())
            .collect();

        let mut removed = 0;
        for key in expired {
            if self
                .entries
                .remove_if(&key, |_, entry| entry.is_expired_at(now))
                .is_some()
            {
                removed += 1;
            }
        }
        removed
    }

    /// Starts the background sweeper task.
    ///
    /// The task wakes every `every` and evicts expired entries in short,
    /// bounded critical sections. Stop it by aborting the returned
    /// handle; the facade does this on `close()` before releasing the
    /// remote connection.
    pub fn start_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);

            loop {
                interval.tick().await;

                let removed = self.sweep_expired();
                if removed > 0 {
                    debug!(removed = removed, "fallback sweep completed");
                }
            }
        })
    }
}
