//! Cache Entry Module
//!
//! Defines the (key, value, optional deadline) triple and wall-clock helpers.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A single cache entry with its absolute expiration instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    /// The entry's key
    pub key: String,
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with an optional absolute deadline.
    pub fn new(key: impl Into<String>, value: V, expires_at: Option<u64>) -> Self {
        Self {
            key: key.into(),
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`.
    pub fn is_expired_at(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Converts a relative TTL into an absolute deadline.
///
/// Sub-millisecond remainders round up so a positive TTL never yields a
/// deadline equal to `now`.
pub fn deadline_after(now: u64, ttl: Duration) -> u64 {
    let mut millis = ttl.as_millis();
    if ttl.subsec_nanos() % 1_000_000 != 0 {
        millis += 1;
    }
    now.saturating_add(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// Renders a Unix millisecond instant as RFC 3339, for diagnostics.
pub fn format_instant(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| ms.to_string())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("key", "test_value".to_string(), None);

        assert_eq!(entry.key, "key");
        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(u64::MAX));
    }

    #[test]
    fn test_entry_expiry_relative_to_now() {
        let now = current_timestamp_ms();
        let entry = CacheEntry::new("key", 1, Some(deadline_after(now, Duration::from_secs(60))));

        assert!(!entry.is_expired_at(current_timestamp_ms()));
        assert!(entry.is_expired_at(now + 60_000));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("key", 1, Some(5_000));

        assert!(!entry.is_expired_at(4_999));
        assert!(entry.is_expired_at(5_000), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(5_001));
    }

    #[test]
    fn test_deadline_after_rounds_up() {
        assert_eq!(deadline_after(1_000, Duration::from_secs(2)), 3_000);
        assert_eq!(deadline_after(1_000, Duration::from_micros(1)), 1_001);
        assert_eq!(deadline_after(1_000, Duration::from_micros(1_500)), 1_002);
        assert_eq!(deadline_after(u64::MAX - 1, Duration::from_secs(10)), u64::MAX);
    }

    #[test]
    fn test_format_instant() {
        assert_eq!(format_instant(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_instant(1_500), "1970-01-01T00:00:01.500Z");
    }

    #[test]
    fn test_entry_serde_omits_missing_deadline() {
        let entry = CacheEntry::new("a", 1, None);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"key":"a","value":1}"#);

        let back: CacheEntry<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
