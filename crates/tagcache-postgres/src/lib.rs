//! # tagcache-postgres
//!
//! PostgreSQL metadata repository for the tagcache hybrid caching layer.
//!
//! [`MetadataStore`] maintains the side index used by the remote path:
//! per-key tags and expiry for tag-based invalidation, plus hit
//! counters. The table is self-provisioned on first use. The facade
//! treats every failure here as best-effort: logged, never surfaced.

mod config;
mod store;

pub use config::MetadataConfig;
pub use store::MetadataStore;
