//! Process shutdown wiring.

use tracing::info;

use crate::manager::CacheManager;

/// Waits for a termination signal, then closes the cache.
///
/// Spawn this once from the process entry point, passing the manager
/// explicitly; the cache registers nothing globally:
///
/// ```ignore
/// let cache = CacheManager::new(CacheConfig::from_env())?;
/// tokio::spawn(tagcache::shutdown_on_signal(cache.clone()));
/// ```
///
/// Sweeper first, remote connection second; see
/// [`CacheManager::close`]. Calling `close` again elsewhere is fine,
/// it is idempotent.
pub async fn shutdown_on_signal(cache: CacheManager) {
    // Wait for Ctrl+C / SIGINT
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received, closing cache");
    cache.close();
}
