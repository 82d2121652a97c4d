//! The cache manager facade.
//!
//! Every public operation follows the same policy: try the remote
//! backend when one is configured, and on any transport failure run the
//! same operation against the in-process fallback store instead. Callers
//! never branch on backend availability and never see a cache-layer
//! error. The worst observable outcome is a miss or a `false` where a
//! hit was expected. Metadata side-effects (tag index, hit counters) are
//! best-effort from the perspective of the primary result.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tagcache_core::{CacheEntry, CacheError, CacheStats, SetOptions};
use tagcache_memory::FallbackStore;
use tagcache_postgres::MetadataStore;
use tagcache_redis::RemoteStore;

use crate::config::CacheConfig;

/// Payloads at or above this serialized size get a log line on `set`.
const LARGE_PAYLOAD_BYTES: usize = 256 * 1024;

/// The single entry point application code uses for caching.
///
/// Cheap to clone; all clones share the same backends and fallback map.
/// Construct one instance at process startup and hand it to request
/// handlers. Lifecycle is owned by the process entry point, which calls
/// [`close`](CacheManager::close) (or [`crate::shutdown_on_signal`]) on
/// the way out.
///
/// A known race, accepted for a cache that is not a system of record:
/// `invalidate_by_tags` is not atomic with concurrent `set` calls on a
/// matching key, so a racing write may either be invalidated or survive.
#[derive(Clone, Debug)]
pub struct CacheManager {
    inner: Arc<ManagerInner>,
}

#[derive(Debug)]
struct ManagerInner {
    remote: Option<RemoteStore>,
    metadata: Option<MetadataStore>,
    fallback: Arc<FallbackStore>,
    default_ttl_secs: u64,
    sweeper: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl CacheManager {
    /// Builds the manager, its backends, and the fallback sweeper.
    ///
    /// Both backend pools are lazy, so an unreachable Redis or database
    /// does not fail construction; only a malformed URL does. Must be
    /// called within a Tokio runtime (the sweeper task is spawned here).
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Config` for a malformed backend URL. This is
    /// the only point where the caching layer raises to its caller.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        let remote = config.redis.as_ref().map(RemoteStore::connect).transpose()?;
        let metadata = config
            .metadata
            .as_ref()
            .map(MetadataStore::connect)
            .transpose()?;

        let fallback = Arc::new(FallbackStore::new());
        let sweeper = fallback
            .clone()
            .start_sweeper(Duration::from_secs(config.sweep_interval_secs.max(1)));

        info!(
            mode = if remote.is_some() { "remote" } else { "fallback" },
            metadata = metadata.is_some(),
            default_ttl_secs = config.default_ttl_secs,
            "cache manager started"
        );

        Ok(Self {
            inner: Arc::new(ManagerInner {
                remote,
                metadata,
                fallback,
                default_ttl_secs: config.default_ttl_secs,
                sweeper: Mutex::new(Some(sweeper)),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Fetches and deserializes the value cached under `key`.
    ///
    /// A malformed stored payload reads as a miss (fails open). A remote
    /// transport failure routes the read to the fallback store. A remote
    /// *miss* is a miss: it does not consult the fallback map, which the
    /// remote path never writes to.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(remote) = &self.inner.remote {
            match remote.get(key).await {
                Ok(Some(bytes)) => return self.decode_remote(key, &bytes),
                Ok(None) => {
                    debug!(key = %key, "cache miss");
                    return None;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, category = %e.category(), "remote get failed, serving from fallback");
                }
            }
        }

        let entry = self.inner.fallback.get(key)?;
        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key = %key, error = %e, "fallback payload failed to deserialize, treating as miss");
                None
            }
        }
    }

    /// Caches `value` under `key`.
    ///
    /// Returns whether the value write itself succeeded; the metadata
    /// upsert on the remote path is fire-and-forget and does not affect
    /// the result. A remote transport failure writes to the fallback
    /// store instead and still counts as success.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, options: SetOptions) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "value failed to serialize, not cached");
                return false;
            }
        };

        let ttl_secs = match options.ttl {
            Some(0) => {
                warn!(key = %key, "requested ttl of 0s, using default");
                self.inner.default_ttl_secs
            }
            Some(ttl) => ttl,
            None => self.inner.default_ttl_secs,
        };

        let entry = CacheEntry::new(value, options.tags, ttl_secs);

        if let Some(remote) = &self.inner.remote {
            let bytes = match serde_json::to_vec(&entry) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(key = %key, error = %e, "envelope failed to serialize, not cached");
                    return false;
                }
            };

            if options.compress {
                debug!(key = %key, size = bytes.len(), "compression requested; stored uncompressed");
            }
            if bytes.len() >= LARGE_PAYLOAD_BYTES {
                warn!(key = %key, size = bytes.len(), "caching large payload");
            }

            match remote.set_with_expiry(key, &bytes, ttl_secs).await {
                Ok(()) => {
                    self.record_write(key, &entry);
                    return true;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, category = %e.category(), "remote set failed, writing to fallback");
                }
            }
        }

        self.inner.fallback.insert(key, entry);
        true
    }

    /// Removes `key` from the active backend, reporting whether a key
    /// was actually removed. The metadata row goes with it, best-effort.
    pub async fn del(&self, key: &str) -> bool {
        if let Some(remote) = &self.inner.remote {
            let keys = [key.to_string()];
            match remote.del(&keys).await {
                Ok(removed) => {
                    self.forget_keys(keys.to_vec());
                    return removed > 0;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "remote del failed, removing from fallback");
                }
            }
        }

        self.inner.fallback.remove(key)
    }

    /// Returns whether `key` currently holds a live entry. On the
    /// fallback path an expired-but-unswept entry reads as absent and is
    /// removed.
    pub async fn exists(&self, key: &str) -> bool {
        if let Some(remote) = &self.inner.remote {
            match remote.exists(key).await {
                Ok(present) => return present,
                Err(e) => {
                    warn!(key = %key, error = %e, "remote exists failed, checking fallback");
                }
            }
        }

        self.inner.fallback.contains(key)
    }

    /// Removes every entry whose tag set intersects `tags` ("any-of")
    /// and returns the number of keys removed.
    ///
    /// On the remote path the metadata repository resolves tags to keys;
    /// if it is unreachable nothing can be resolved and the count is 0
    /// (visible through the health report, by design). On the fallback
    /// path the map is scanned directly and the metadata repository is
    /// left alone; the two backends' tag indexes are independent.
    /// Without a metadata repository configured, only the fallback map
    /// can be scanned.
    pub async fn invalidate_by_tags(&self, tags: &[String]) -> u64 {
        if tags.is_empty() {
            return 0;
        }

        if let Some(remote) = &self.inner.remote
            && let Some(metadata) = &self.inner.metadata
        {
            let keys = match metadata.find_by_tags(tags).await {
                Ok(keys) => keys,
                Err(e) => {
                    warn!(error = %e, "metadata tag lookup failed, no remote keys invalidated");
                    return 0;
                }
            };
            if keys.is_empty() {
                return 0;
            }

            match remote.del(&keys).await {
                Ok(removed) => {
                    if let Err(e) = metadata.delete_by_keys(&keys).await {
                        warn!(error = %e, "failed to drop metadata rows after invalidation");
                    }
                    debug!(removed = removed, tag_count = tags.len(), "invalidated by tags");
                    return removed;
                }
                Err(e) => {
                    warn!(error = %e, "remote invalidation failed, scanning fallback");
                }
            }
        } else if self.inner.remote.is_some() {
            warn!("no metadata repository configured, remote entries cannot be resolved by tag");
        }

        self.inner.fallback.invalidate_by_tags(tags)
    }

    /// Empties the active backend and purges all metadata rows
    /// (best-effort, remote path only).
    pub async fn clear(&self) -> bool {
        if let Some(remote) = &self.inner.remote {
            match remote.flush_all().await {
                Ok(()) => {
                    if let Some(metadata) = &self.inner.metadata
                        && let Err(e) = metadata.delete_all().await
                    {
                        warn!(error = %e, "failed to purge metadata rows after clear");
                    }
                    info!("remote cache cleared");
                    return true;
                }
                Err(e) => {
                    warn!(error = %e, "remote flush failed, clearing fallback");
                }
            }
        }

        self.inner.fallback.clear();
        true
    }

    /// Gathers statistics from the active backend.
    ///
    /// Remote: key count and memory figure from backend introspection,
    /// hit totals from the metadata repository (zero when unreachable).
    /// Fallback: live map size only; hit tracking lives in the metadata
    /// repository, so the hit count reads zero here.
    pub async fn stats(&self) -> CacheStats {
        if let Some(remote) = &self.inner.remote {
            match remote.dbsize().await {
                Ok(total_keys) => {
                    let memory_usage = match remote.info().await {
                        Ok(info) => parse_info_field(&info, "used_memory_human"),
                        Err(e) => {
                            warn!(error = %e, "remote memory diagnostics unavailable");
                            None
                        }
                    };

                    let (hit_count, total_entries) = match &self.inner.metadata {
                        Some(metadata) => match metadata.aggregate_hit_stats().await {
                            Ok(hits) => (hits.total_hits, hits.total_rows),
                            Err(e) => {
                                warn!(error = %e, "metadata stats unavailable");
                                (0, total_keys)
                            }
                        },
                        None => (0, total_keys),
                    };

                    return CacheStats {
                        total_keys,
                        memory_usage,
                        hit_count,
                        total_entries,
                    };
                }
                Err(e) => {
                    warn!(error = %e, "remote stats failed, reporting fallback stats");
                }
            }
        }

        let live = self.inner.fallback.len() as u64;
        CacheStats {
            total_keys: live,
            memory_usage: None,
            hit_count: 0,
            total_entries: live,
        }
    }

    /// Stops the fallback sweeper, then releases the remote connection
    /// pool, in that order. Idempotent and safe to call concurrently
    /// with in-flight operations; those may fail over to the fallback
    /// map but never panic.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let sweeper = match self.inner.sweeper.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = sweeper {
            handle.abort();
        }

        if let Some(remote) = &self.inner.remote {
            remote.close();
        }

        info!("cache manager closed");
    }

    /// Returns `true` once [`close`](CacheManager::close) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn remote(&self) -> Option<&RemoteStore> {
        self.inner.remote.as_ref()
    }

    pub(crate) fn metadata(&self) -> Option<&MetadataStore> {
        self.inner.metadata.as_ref()
    }

    pub(crate) fn fallback(&self) -> &FallbackStore {
        &self.inner.fallback
    }

    fn decode_remote<T: DeserializeOwned>(&self, key: &str, bytes: &[u8]) -> Option<T> {
        let entry: CacheEntry = match serde_json::from_slice(bytes) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key = %key, error = %e, "stored envelope failed to deserialize, treating as miss");
                return None;
            }
        };

        match serde_json::from_value(entry.value) {
            Ok(value) => {
                debug!(key = %key, "cache hit");
                self.record_hit(key);
                Some(value)
            }
            Err(e) => {
                debug!(key = %key, error = %e, "stored payload failed to deserialize, treating as miss");
                None
            }
        }
    }

    /// Fire-and-forget hit-count increment. Failures are logged, never
    /// surfaced, and there is no retry, so the counter may lag.
    fn record_hit(&self, key: &str) {
        if let Some(metadata) = self.inner.metadata.clone() {
            let key = key.to_string();
            tokio::spawn(async move {
                if let Err(e) = metadata.increment_hit(&key).await {
                    warn!(key = %key, error = %e, "failed to record cache hit");
                }
            });
        }
    }

    /// Fire-and-forget metadata upsert after a successful remote write.
    fn record_write(&self, key: &str, entry: &CacheEntry) {
        if let Some(metadata) = self.inner.metadata.clone() {
            let key = key.to_string();
            let tags = entry.tags.clone();
            let expires_at = entry.expires_at();
            tokio::spawn(async move {
                if let Err(e) = metadata.upsert(&key, &tags, expires_at).await {
                    warn!(key = %key, error = %e, "failed to record cache metadata");
                }
            });
        }
    }

    /// Fire-and-forget metadata row removal after a remote delete.
    fn forget_keys(&self, keys: Vec<String>) {
        if let Some(metadata) = self.inner.metadata.clone() {
            tokio::spawn(async move {
                if let Err(e) = metadata.delete_by_keys(&keys).await {
                    warn!(error = %e, "failed to drop metadata rows");
                }
            });
        }
    }
}

/// Pulls a single `field:value` line out of an INFO-style diagnostics
/// blob.
fn parse_info_field(info: &str, field: &str) -> Option<String> {
    info.lines()
        .find_map(|line| line.strip_prefix(field)?.strip_prefix(':').map(str::trim))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_info_field_extracts_value() {
        let info = "# Memory\r\nused_memory:1024\r\nused_memory_human:1.00K\r\n";
        assert_eq!(
            parse_info_field(info, "used_memory_human").as_deref(),
            Some("1.00K")
        );
        assert_eq!(parse_info_field(info, "used_memory").as_deref(), Some("1024"));
        assert_eq!(parse_info_field(info, "maxmemory"), None);
    }

    #[test]
    fn parse_info_field_ignores_empty_values() {
        assert_eq!(parse_info_field("used_memory_human:\r\n", "used_memory_human"), None);
    }
}
