//! # tagcache-memory
//!
//! In-process fallback store for the tagcache hybrid caching layer.
//!
//! This crate provides [`FallbackStore`], a concurrent map of key →
//! entry envelope used whenever the remote backend is unset or
//! unreachable, together with its background expiry sweeper. Values kept
//! here do not survive process restarts; only cache metadata (owned by
//! the postgres adapter) is persistent.

mod store;

pub use store::{DEFAULT_SWEEP_INTERVAL, FallbackStore};
