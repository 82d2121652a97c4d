//! # tagcache-redis
//!
//! Redis adapter for the tagcache hybrid caching layer.
//!
//! [`RemoteStore`] wraps a lazy [`deadpool_redis`] pool and exposes the
//! handful of primitives the cache facade needs: get, set-with-expiry,
//! bulk delete, existence check, flush, diagnostics, and a liveness
//! probe. Every command carries an enforced timeout so no cache call can
//! block a request handler indefinitely.

mod config;
mod store;

pub use config::RedisConfig;
pub use store::RemoteStore;
