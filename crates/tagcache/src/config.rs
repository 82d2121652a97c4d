//! Top-level configuration for the cache manager.

use serde::{Deserialize, Serialize};

use tagcache_core::DEFAULT_TTL_SECS;
use tagcache_postgres::MetadataConfig;
use tagcache_redis::RedisConfig;

/// Default interval between fallback sweeps, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Configuration for the whole caching layer.
///
/// The remote backend is selected by the presence of its URL: leaving
/// `redis` unset is the documented signal to operate in fallback-only
/// mode from process start (the expected shape in local development,
/// reported as `degraded` by the health check, not `unhealthy`). The
/// metadata repository is likewise optional and only consulted on the
/// remote path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Remote backend configuration. `None` selects fallback-only mode.
    pub redis: Option<RedisConfig>,

    /// Metadata repository configuration. `None` disables tag resolution
    /// and hit tracking on the remote path.
    pub metadata: Option<MetadataConfig>,

    /// Lifetime applied when a `set` does not specify one, in seconds.
    pub default_ttl_secs: u64,

    /// Interval between background sweeps of the fallback map, in
    /// seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis: None,
            metadata: None,
            default_ttl_secs: DEFAULT_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl CacheConfig {
    /// Creates a fallback-only configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads configuration from the environment: `REDIS_URL` for the
    /// remote backend, `DATABASE_URL` for the metadata repository.
    /// Absent variables leave the corresponding backend unconfigured.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("REDIS_URL") {
            config.redis = Some(RedisConfig::new(url));
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.metadata = Some(MetadataConfig::new(url));
        }
        config
    }

    /// Sets the remote backend URL.
    #[must_use]
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis = Some(RedisConfig::new(url));
        self
    }

    /// Sets the remote backend configuration.
    #[must_use]
    pub fn with_redis(mut self, redis: RedisConfig) -> Self {
        self.redis = Some(redis);
        self
    }

    /// Sets the metadata repository URL.
    #[must_use]
    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata = Some(MetadataConfig::new(url));
        self
    }

    /// Sets the metadata repository configuration.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MetadataConfig) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Sets the default entry lifetime.
    #[must_use]
    pub fn with_default_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.default_ttl_secs = ttl_secs;
        self
    }

    /// Sets the fallback sweep interval.
    #[must_use]
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fallback_only() {
        let config = CacheConfig::default();
        assert!(config.redis.is_none());
        assert!(config.metadata.is_none());
        assert_eq!(config.default_ttl_secs, 3600);
        assert_eq!(config.sweep_interval_secs, 300);
    }

    #[test]
    fn builders() {
        let config = CacheConfig::new()
            .with_redis_url("redis://127.0.0.1:6379")
            .with_metadata_url("postgres://localhost/app")
            .with_default_ttl_secs(120)
            .with_sweep_interval_secs(30);

        assert_eq!(
            config.redis.as_ref().map(|r| r.url.as_str()),
            Some("redis://127.0.0.1:6379")
        );
        assert_eq!(
            config.metadata.as_ref().map(|m| m.url.as_str()),
            Some("postgres://localhost/app")
        );
        assert_eq!(config.default_ttl_secs, 120);
        assert_eq!(config.sweep_interval_secs, 30);
    }
}
