//! Thin adapter over the remote key-value protocol.

use std::future::Future;
use std::time::Duration;

use deadpool_redis::{Connection, Pool};
use redis::AsyncCommands;
use tracing::{debug, info};

use tagcache_core::{CacheError, CacheResult};

use crate::config::RedisConfig;

/// Client for the remote key-value backend.
///
/// The connection pool is lazy: nothing is dialed at construction, the
/// first command establishes connections and the pool re-establishes
/// them as needed. Every command is bounded by the configured command
/// timeout; an overrun or any transport failure is reported as an error
/// value for the facade to pattern-match on. There is no tripped-circuit
/// state here; each call attempts the remote backend afresh.
#[derive(Clone, Debug)]
pub struct RemoteStore {
    pool: Pool,
    command_timeout: Duration,
}

impl RemoteStore {
    /// Builds the client and its lazy connection pool.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Config` if the URL is malformed. This is the
    /// only cache-layer failure surfaced to callers, and only here.
    pub fn connect(config: &RedisConfig) -> CacheResult<Self> {
        info!(
            pool_size = config.pool_size,
            connect_timeout_ms = config.connect_timeout_ms,
            command_timeout_ms = config.command_timeout_ms,
            "Creating Redis connection pool"
        );

        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);

        let mut pool_config = deadpool_redis::PoolConfig::new(config.pool_size as usize);
        pool_config.timeouts.create = Some(connect_timeout);
        pool_config.timeouts.wait = Some(connect_timeout);

        let mut cfg = deadpool_redis::Config::from_url(&config.url);
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| CacheError::config(format!("invalid Redis configuration: {e}")))?;

        Ok(Self {
            pool,
            command_timeout: Duration::from_millis(config.command_timeout_ms),
        })
    }

    /// Fetches the raw stored bytes for `key`.
    pub async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.conn().await?;
        self.bounded(conn.get::<_, Option<Vec<u8>>>(key)).await
    }

    /// Stores `value` under `key` with a server-side expiry.
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &[u8],
        ttl_secs: u64,
    ) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        self.bounded(conn.set_ex::<_, _, ()>(key, value, ttl_secs))
            .await?;
        debug!(key = %key, ttl_secs = ttl_secs, "remote set");
        Ok(())
    }

    /// Deletes the given keys, returning how many were actually removed.
    pub async fn del(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn().await?;
        self.bounded(conn.del::<_, u64>(keys)).await
    }

    /// Returns whether `key` exists.
    pub async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.conn().await?;
        self.bounded(conn.exists::<_, bool>(key)).await
    }

    /// Removes every key in the current database.
    pub async fn flush_all(&self) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        self.bounded(redis::cmd("FLUSHDB").query_async(&mut conn))
            .await
    }

    /// Returns the backend's memory diagnostics text.
    pub async fn info(&self) -> CacheResult<String> {
        let mut conn = self.conn().await?;
        self.bounded(redis::cmd("INFO").arg("memory").query_async(&mut conn))
            .await
    }

    /// Returns the number of keys in the current database.
    pub async fn dbsize(&self) -> CacheResult<u64> {
        let mut conn = self.conn().await?;
        self.bounded(redis::cmd("DBSIZE").query_async(&mut conn))
            .await
    }

    /// Liveness probe.
    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        let _pong: String = self
            .bounded(redis::cmd("PING").query_async(&mut conn))
            .await?;
        Ok(())
    }

    /// Closes the pool. Commands issued afterwards fail with a transport
    /// error, which the facade recovers from like any other.
    pub fn close(&self) {
        self.pool.close();
    }

    async fn conn(&self) -> CacheResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::transport(format!("failed to get Redis connection: {e}")))
    }

    async fn bounded<T>(
        &self,
        command: impl Future<Output = redis::RedisResult<T>>,
    ) -> CacheResult<T> {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::transport(e.to_string())),
            Err(_) => Err(CacheError::timeout(self.command_timeout.as_secs())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> RedisConfig {
        // Port 1 is never a Redis server; connection attempts are
        // refused immediately.
        RedisConfig::new("redis://127.0.0.1:1")
            .with_connect_timeout_ms(500)
            .with_command_timeout_ms(500)
    }

    #[test]
    fn malformed_url_fails_at_construction() {
        let err = RemoteStore::connect(&RedisConfig::new("not-a-redis-url"))
            .expect_err("construction should reject a malformed URL");
        assert!(err.is_config());
    }

    #[test]
    fn valid_url_connects_lazily() {
        // No server is running, but the pool is lazy so construction
        // must still succeed.
        assert!(RemoteStore::connect(&unreachable_config()).is_ok());
    }

    #[tokio::test]
    async fn commands_report_transport_errors_when_unreachable() {
        let store = RemoteStore::connect(&unreachable_config()).expect("lazy connect");

        let err = store.get("any").await.expect_err("no server is listening");
        assert!(err.is_transport());

        let err = store.ping().await.expect_err("no server is listening");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn del_with_no_keys_is_a_no_op() {
        let store = RemoteStore::connect(&unreachable_config()).expect("lazy connect");
        // Must not even touch the pool.
        assert_eq!(store.del(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn closed_pool_reports_transport_errors() {
        let store = RemoteStore::connect(&unreachable_config()).expect("lazy connect");
        store.close();
        store.close(); // idempotent

        let err = store.get("any").await.expect_err("pool is closed");
        assert!(err.is_transport());
    }
}
