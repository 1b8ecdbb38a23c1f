//! Concurrent Cache Module
//!
//! Wraps a [`CacheStore`] behind a single mutex so one instance can be shared
//! across threads. Every public operation holds the lock for its whole
//! duration, snapshot and restore I/O included.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::cache::entry::{current_timestamp_ms, format_instant};
use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::snapshot;

// == Cache ==
/// Thread-safe bounded cache with LRU eviction, per-entry TTL and snapshots.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct Cache<V> {
    /// Fixed at construction, readable without locking
    capacity: usize,
    inner: Mutex<CacheStore<V>>,
}

impl<V> Cache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidConfig`](crate::CacheError::InvalidConfig)
    /// when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            capacity,
            inner: Mutex::new(CacheStore::new(capacity)?),
        })
    }

    /// Creates a cache from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity)
    }

    // == Put ==
    /// Stores `value` under `key`, making it the most recently used entry.
    ///
    /// With `ttl` the entry expires that long from now; without it any
    /// previous deadline is cleared and the entry only leaves by eviction.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.inner.lock().put(key.into(), value, ttl);
    }

    /// Removes expired entries now rather than on the next access.
    pub fn purge_expired(&self) -> usize {
        self.inner.lock().sweep_expired()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of live entries. Expired ones are swept first.
    pub fn len(&self) -> usize {
        let mut store = self.inner.lock();
        store.sweep_expired();
        store.len()
    }

    pub fn is_empty(&self) -> bool {
        let mut store = self.inner.lock();
        store.sweep_expired();
        store.is_empty()
    }

    /// Counters as of now; expired entries are swept (and counted) first.
    pub fn stats(&self) -> CacheStats {
        let mut store = self.inner.lock();
        store.sweep_expired();
        store.stats()
    }
}

impl<V: Clone> Cache<V> {
    // == Get ==
    /// Returns a copy of the value for `key`, or `None` if it is absent or expired.
    ///
    /// A hit makes the key the most recently used entry.
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }
}

impl<V: Serialize> Cache<V> {
    // == Snapshot ==
    /// Serializes the current state into a byte vector.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.snapshot_to(&mut buf)?;
        Ok(buf)
    }

    /// Serializes the current state into `writer`.
    ///
    /// Expired entries are swept first. The lock is held until the last
    /// byte is written, so the output is a consistent point-in-time view.
    pub fn snapshot_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut store = self.inner.lock();
        let now = current_timestamp_ms();
        store.sweep_expired_at(now);

        snapshot::encode(writer, store.capacity(), now, store.iter())?;
        info!(entries = store.len(), "cache snapshot written");
        Ok(())
    }

    /// Writes a snapshot to `path`, replacing any existing file atomically.
    ///
    /// The data goes to a uniquely named temporary file in the same
    /// directory, which is synced and then renamed over `path`. Concurrent
    /// saves to one path never share a temporary file; the last rename wins.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let result = (|| -> Result<()> {
            let mut file = NamedTempFile::new_in(dir)?;
            self.snapshot_to(&mut file)?;
            file.as_file().sync_all()?;
            file.persist(path).map_err(|err| err.error)?;
            Ok(())
        })();

        if let Err(err) = &result {
            warn!(path = %path.display(), error = %err, "failed to save cache snapshot");
        }
        result
    }
}

impl<V: DeserializeOwned> Cache<V> {
    // == Restore ==
    /// Replaces the entire state with the snapshot in `bytes`.
    pub fn restore(&self, bytes: &[u8]) -> Result<()> {
        self.restore_from(bytes)
    }

    /// Replaces the entire state with the snapshot read from `reader`.
    ///
    /// The snapshot is decoded and rebuilt in full before anything is
    /// replaced; on any error the previous state is left untouched. Entries
    /// that expired while the snapshot was at rest are dropped, and if the
    /// snapshot holds more entries than this cache's capacity only the most
    /// recently used ones are kept.
    pub fn restore_from<R: Read>(&self, reader: R) -> Result<()> {
        let mut store = self.inner.lock();

        let decoded = snapshot::decode::<V, _>(reader).inspect_err(|err| {
            warn!(error = %err, "rejected cache snapshot");
        })?;

        let snapshot_len = decoded.entries.len();
        let rebuilt = CacheStore::from_entries(self.capacity, decoded.entries, current_timestamp_ms())
            .inspect_err(|err| warn!(error = %err, "rejected cache snapshot"))?;

        let stats = rebuilt.stats();
        if stats.evictions > 0 {
            warn!(
                snapshot_capacity = decoded.capacity,
                capacity = self.capacity,
                dropped = stats.evictions,
                "snapshot exceeds cache capacity, least recently used entries dropped"
            );
        }

        *store = rebuilt;
        info!(
            entries = store.len(),
            expired = stats.expirations,
            snapshot_entries = snapshot_len,
            taken_at = %format_instant(decoded.taken_at),
            "cache restored from snapshot"
        );
        Ok(())
    }

    /// Replaces the entire state with the snapshot stored at `path`.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.restore_from(file)
    }
}

/// Diagnostic view: capacity, entries in recency order (oldest first) and
/// the raw expiration map. Not a stable format.
impl<V: fmt::Debug> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.inner.lock();
        let entries: Vec<(&str, &V)> = store.iter().map(|(key, value, _)| (key, value)).collect();
        let expirations: BTreeMap<&str, String> = store
            .expirations()
            .map(|(key, at)| (key, format_instant(at)))
            .collect();

        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("entries", &entries)
            .field("expirations", &expirations)
            .finish()
    }
}
