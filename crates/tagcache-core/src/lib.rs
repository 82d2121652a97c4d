//! # tagcache-core
//!
//! Core types for the tagcache hybrid caching layer.
//!
//! This crate defines the entry envelope, per-write options, the error
//! taxonomy, and the stats/health types shared by the backend adapters
//! and the cache facade. It performs no I/O; the adapters live in
//! separate crates.
//!
//! ## Overview
//!
//! - [`CacheEntry`]: the wrapped value plus tags, creation time, and TTL;
//!   the unit stored by both backends.
//! - [`SetOptions`]: per-write TTL, tags, and the advisory compression
//!   hint.
//! - [`CacheError`]: explicit error values for transport, serialization,
//!   metadata, and configuration failures.
//! - [`CacheStats`] / [`HitStats`]: aggregate counters.
//! - [`HealthStatus`] / [`HealthReport`]: the tri-state health verdict.

mod entry;
mod error;
mod health;
mod stats;

pub use entry::{CacheEntry, DEFAULT_TTL_SECS, SetOptions};
pub use error::{CacheError, CacheResult, ErrorCategory};
pub use health::{HealthReport, HealthStatus};
pub use stats::{CacheStats, HitStats};
