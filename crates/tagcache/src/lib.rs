//! # tagcache
//!
//! Hybrid, tag-aware caching layer: a Redis-first cache with transparent
//! degradation to an in-process store, bulk invalidation by semantic tag,
//! and expiry semantics independent of the backend in use.
//!
//! ## Overview
//!
//! [`CacheManager`] is the sole integration surface for application
//! code. Every operation tries the remote backend when one is
//! configured and silently falls back to the in-process map on any
//! transport failure, so callers never see a cache-layer error after
//! construction. Tags attached at write time allow grouped invalidation
//! (`entity:id`-style keys such as `project:42`, tag sets such as
//! `["project:42", "projects"]`); on the remote path a relational
//! metadata table resolves tags to keys, on the fallback path the map is
//! scanned directly.
//!
//! ## Example
//!
//! ```ignore
//! use tagcache::{CacheConfig, CacheManager, SetOptions};
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Project { name: String }
//!
//! # async fn demo() -> Result<(), tagcache::CacheError> {
//! let cache = CacheManager::new(CacheConfig::from_env())?;
//!
//! cache.set(
//!     "project:42",
//!     &Project { name: "Acme".into() },
//!     SetOptions::new().with_ttl(60).with_tags(["project:42", "projects"]),
//! ).await;
//!
//! let cached: Option<Project> = cache.get("project:42").await;
//! cache.invalidate_by_tags(&["projects".to_string()]).await;
//!
//! cache.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure policy
//!
//! Remote transport errors (timeout, connection refused, protocol
//! error) are recovered by falling back locally. Malformed stored
//! payloads read as misses. Metadata repository failures are logged and
//! swallowed; they can shrink `invalidate_by_tags` and `stats` results
//! on the remote path, which the health report makes visible. Only
//! construction can fail, and only on malformed configuration.

mod config;
mod health;
mod manager;
mod shutdown;

pub use config::{CacheConfig, DEFAULT_SWEEP_INTERVAL_SECS};
pub use manager::CacheManager;
pub use shutdown::shutdown_on_signal;

// Re-export the leaf types callers interact with.
pub use tagcache_core::{
    CacheEntry, CacheError, CacheResult, CacheStats, DEFAULT_TTL_SECS, ErrorCategory,
    HealthReport, HealthStatus, HitStats, SetOptions,
};
pub use tagcache_postgres::MetadataConfig;
pub use tagcache_redis::RedisConfig;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use tagcache::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::CacheConfig;
    pub use crate::manager::CacheManager;
    pub use crate::shutdown_on_signal;
    pub use tagcache_core::{
        CacheError, CacheResult, CacheStats, HealthReport, HealthStatus, SetOptions,
    };
    pub use tagcache_postgres::MetadataConfig;
    pub use tagcache_redis::RedisConfig;
}
