//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.
//! Not synchronized; see [`Cache`](crate::cache::Cache) for the shared form.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, deadline_after};
use crate::cache::{CacheEntry, CacheStats, ExpiryIndex, LruTracker};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded key-value storage with LRU eviction and per-entry TTL.
///
/// Every key in `expiry` is also in `entries`, and `entries` never holds
/// more than `capacity` keys once an operation returns.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, V>,
    /// LRU access tracker
    lru: LruTracker,
    /// Absolute deadlines for TTL-bearing keys
    expiry: ExpiryIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidConfig`] when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            expiry: ExpiryIndex::new(),
            stats: CacheStats::new(),
            capacity,
        })
    }

    // == Rebuild ==
    /// Rebuilds a store from entries listed oldest to newest.
    ///
    /// Entries already expired at `now` are dropped and counted as
    /// expirations. When there are more
    /// entries than `capacity`, the least recently used ones are evicted.
    pub fn from_entries<I>(capacity: usize, entries: I, now: u64) -> Result<Self>
    where
        I: IntoIterator<Item = CacheEntry<V>>,
    {
        let mut store = Self::new(capacity)?;
        let mut seen = HashSet::new();
        let mut lapsed = 0;

        for entry in entries {
            if !seen.insert(entry.key.clone()) {
                return Err(CacheError::Decode(format!(
                    "duplicate key `{}` in snapshot",
                    entry.key
                )));
            }
            if entry.is_expired_at(now) {
                lapsed += 1;
                continue;
            }
            store.lru.touch(&entry.key);
            if let Some(expires_at) = entry.expires_at {
                store.expiry.set(&entry.key, expires_at);
            }
            store.entries.insert(entry.key, entry.value);
        }

        if lapsed > 0 {
            debug!(count = lapsed, "dropped expired entries from snapshot");
            store.stats.record_expirations(lapsed);
        }
        while store.entries.len() > store.capacity {
            store.evict_oldest();
        }
        store.stats.set_total_entries(store.entries.len());

        Ok(store)
    }

    // == Put ==
    /// Stores a key-value pair with optional TTL, using the wall clock.
    pub fn put(&mut self, key: String, value: V, ttl: Option<Duration>) {
        self.put_at(key, value, ttl, current_timestamp_ms());
    }

    /// Stores a key-value pair as of `now`.
    ///
    /// The key becomes most recently used. Its deadline is replaced: set from
    /// `ttl` when given (and non-zero), cleared otherwise. If the insert
    /// pushes the store over capacity, the least recently used entry goes.
    pub fn put_at(&mut self, key: String, value: V, ttl: Option<Duration>, now: u64) {
        self.sweep_expired_at(now);

        self.lru.touch(&key);
        match ttl.filter(|ttl| !ttl.is_zero()) {
            Some(ttl) => self.expiry.set(&key, deadline_after(now, ttl)),
            None => {
                self.expiry.remove(&key);
            }
        }
        self.entries.insert(key, value);

        if self.entries.len() > self.capacity {
            self.evict_oldest();
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key, using the wall clock.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Retrieves a value by key as of `now`.
    ///
    /// A hit makes the key most recently used. Expired entries are swept
    /// first, so they are never returned.
    pub fn get_at(&mut self, key: &str, now: u64) -> Option<&V> {
        self.sweep_expired_at(now);

        if self.entries.contains_key(key) {
            self.lru.touch(key);
            self.stats.record_hit();
            self.entries.get(key)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Sweep Expired ==
    /// Removes all expired entries according to the wall clock.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        self.sweep_expired_at(current_timestamp_ms())
    }

    /// Removes every entry whose deadline is at or before `now`.
    pub fn sweep_expired_at(&mut self, now: u64) -> usize {
        let expired = self.expiry.drain_expired(now);

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        let count = expired.len();
        if count > 0 {
            self.stats.record_expirations(count);
            self.stats.set_total_entries(self.entries.len());
            debug!(count, "swept expired entries");
        }
        count
    }

    /// Drops the least recently used entry and its deadline.
    fn evict_oldest(&mut self) {
        if let Some(key) = self.lru.evict_oldest() {
            self.entries.remove(&key);
            self.expiry.remove(&key);
            self.stats.record_eviction();
            debug!(key = %key, "evicted least recently used entry");
        }
    }

    // == Inspection ==
    /// Iterates `(key, value, deadline)` from least to most recently used.
    ///
    /// Does not touch recency order or sweep.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V, Option<u64>)> + '_ {
        self.lru.iter().filter_map(move |key| {
            self.entries
                .get_key_value(key)
                .map(|(key, value)| (key.as_str(), value, self.expiry.get(key)))
        })
    }

    /// Iterates the raw `(key, deadline)` expiration map.
    pub fn expirations(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.expiry.iter()
    }

    /// Returns the recorded deadline for a key, without sweeping.
    pub fn expires_at(&self, key: &str) -> Option<u64> {
        self.expiry.get(key)
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
