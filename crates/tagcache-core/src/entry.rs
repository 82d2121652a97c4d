//! The entry envelope stored by both cache backends.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifetime applied when the caller does not request one explicitly.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// A cached value together with its tags, creation time, and lifetime.
///
/// The envelope is the unit written to both the remote backend (as
/// serialized JSON) and the in-process fallback map. It is immutable once
/// written: a `set` on the same key replaces the whole envelope, expired
/// entries are never resurrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The serialized payload.
    pub value: Value,

    /// Labels used for grouped invalidation. May be empty, in which case
    /// the entry can only be removed by key or by a full clear.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Timestamp of the write.
    pub created_at: DateTime<Utc>,

    /// Requested lifetime in seconds.
    pub ttl_secs: u64,
}

impl CacheEntry {
    /// Creates a new envelope stamped with the current time.
    #[must_use]
    pub fn new(value: Value, tags: Vec<String>, ttl_secs: u64) -> Self {
        Self {
            value,
            tags,
            created_at: Utc::now(),
            ttl_secs,
        }
    }

    /// The absolute timestamp at which this entry stops being servable.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::seconds(self.ttl_secs as i64)
    }

    /// Returns `true` if the entry is past its lifetime at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Returns `true` if the entry is past its lifetime.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns `true` if this entry carries at least one of the given
    /// tags. Matching is "any-of": a single shared tag is enough.
    #[must_use]
    pub fn matches_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }
}

/// Per-write options accepted by the cache facade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Lifetime in seconds. `None` selects the facade default (3600s).
    pub ttl: Option<u64>,

    /// Tags attached to the entry for grouped invalidation.
    pub tags: Vec<String>,

    /// Advisory compression hint. Large payloads are logged either way;
    /// the stored representation is not compressed.
    pub compress: bool,
}

impl SetOptions {
    /// Creates empty options: default TTL, no tags, no compression hint.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit lifetime in seconds.
    #[must_use]
    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl = Some(ttl_secs);
        self
    }

    /// Sets the tags attached to the entry.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the advisory compression hint.
    #[must_use]
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry_created_at(secs_ago: i64, ttl_secs: u64) -> CacheEntry {
        CacheEntry {
            value: json!({"name": "Acme"}),
            tags: vec!["projects".to_string()],
            created_at: Utc::now() - Duration::seconds(secs_ago),
            ttl_secs,
        }
    }

    #[test]
    fn fresh_entry_is_live() {
        let entry = CacheEntry::new(json!(1), vec![], 60);
        assert!(!entry.is_expired());
    }

    #[test]
    fn entry_expires_after_ttl() {
        let entry = entry_created_at(120, 60);
        assert!(entry.is_expired());

        let entry = entry_created_at(30, 60);
        assert!(!entry.is_expired());
    }

    #[test]
    fn expires_at_is_created_at_plus_ttl() {
        let entry = entry_created_at(0, 60);
        assert_eq!(
            entry.expires_at(),
            entry.created_at + Duration::seconds(60)
        );
    }

    #[test]
    fn tag_matching_is_any_of() {
        let entry = CacheEntry::new(
            json!(null),
            vec!["project:42".to_string(), "projects".to_string()],
            60,
        );

        assert!(entry.matches_any_tag(&["projects".to_string()]));
        assert!(entry.matches_any_tag(&[
            "unrelated".to_string(),
            "project:42".to_string(),
        ]));
        assert!(!entry.matches_any_tag(&["methodologies".to_string()]));
        assert!(!entry.matches_any_tag(&[]));
    }

    #[test]
    fn untagged_entry_never_matches() {
        let entry = CacheEntry::new(json!(null), vec![], 60);
        assert!(!entry.matches_any_tag(&["projects".to_string()]));
    }

    #[test]
    fn envelope_round_trips_through_json() {
        let entry = entry_created_at(10, 300);
        let bytes = serde_json::to_vec(&entry).unwrap();
        let parsed: CacheEntry = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn options_defaults() {
        let options = SetOptions::new();
        assert_eq!(options.ttl, None);
        assert!(options.tags.is_empty());
        assert!(!options.compress);
    }

    #[test]
    fn options_builders() {
        let options = SetOptions::new()
            .with_ttl(60)
            .with_tags(["project:42", "projects"])
            .with_compress(true);

        assert_eq!(options.ttl, Some(60));
        assert_eq!(options.tags, vec!["project:42", "projects"]);
        assert!(options.compress);
    }
}
