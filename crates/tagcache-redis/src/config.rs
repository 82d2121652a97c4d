//! Configuration for the Redis remote store client.

use serde::{Deserialize, Serialize};

/// Configuration for the remote key-value backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Connection URL: `redis://[:password@]host:port[/db]`
    pub url: String,

    /// Connection pool size (maximum number of connections).
    pub pool_size: u32,

    /// Upper bound on establishing or acquiring a connection, in
    /// milliseconds.
    pub connect_timeout_ms: u64,

    /// Upper bound on a single command, in milliseconds. A command that
    /// overruns this is treated as a remote failure.
    pub command_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".into(),
            pool_size: 16,
            connect_timeout_ms: 10_000,
            command_timeout_ms: 5_000,
        }
    }
}

impl RedisConfig {
    /// Creates a new configuration with the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub fn with_pool_size(mut self, size: u32) -> Self {
        self.pool_size = size;
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_connect_timeout_ms(mut self, timeout: u64) -> Self {
        self.connect_timeout_ms = timeout;
        self
    }

    /// Sets the per-command timeout.
    #[must_use]
    pub fn with_command_timeout_ms(mut self, timeout: u64) -> Self {
        self.command_timeout_ms = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RedisConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.pool_size, 16);
        assert_eq!(config.connect_timeout_ms, 10_000);
        assert_eq!(config.command_timeout_ms, 5_000);
    }

    #[test]
    fn builders() {
        let config = RedisConfig::new("redis://cache.internal:6380")
            .with_pool_size(4)
            .with_connect_timeout_ms(500)
            .with_command_timeout_ms(250);

        assert_eq!(config.url, "redis://cache.internal:6380");
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.connect_timeout_ms, 500);
        assert_eq!(config.command_timeout_ms, 250);
    }
}
