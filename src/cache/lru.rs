//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{HashMap, VecDeque};

/// Stale queue slots are only compacted past this size.
const COMPACT_THRESHOLD: usize = 64;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch appends a `(key, stamp)` pair and records the stamp as the
/// key's live position, so touching and popping are amortized O(1). Pairs
/// whose stamp no longer matches are stale and get skipped:
/// - Front = Least recently used
/// - Back = Most recently used
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Access log, oldest first, possibly holding stale pairs
    order: VecDeque<(String, u64)>,
    /// Current stamp of every tracked key
    live: HashMap<String, u64>,
    /// Stamp handed out by the next touch
    next_stamp: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, tracking it if it is new.
    pub fn touch(&mut self, key: &str) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;

        match self.live.get_mut(key) {
            Some(current) => *current = stamp,
            None => {
                self.live.insert(key.to_string(), stamp);
            }
        }
        self.order.push_back((key.to_string(), stamp));
        self.compact_if_sparse();
    }

    // == Remove ==
    /// Stops tracking a key. Returns whether it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.live.remove(key).is_some();
        if removed {
            self.compact_if_sparse();
        }
        removed
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        while let Some((key, stamp)) = self.order.pop_front() {
            if self.live.get(&key) == Some(&stamp) {
                self.live.remove(&key);
                return Some(key);
            }
        }
        None
    }

    // == Iterate ==
    /// Iterates tracked keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter(move |(key, stamp)| self.live.get(key) == Some(stamp))
            .map(|(key, _)| key.as_str())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops stale pairs once they outnumber live keys.
    fn compact_if_sparse(&mut self) {
        if self.order.len() <= COMPACT_THRESHOLD || self.order.len() <= 2 * self.live.len() {
            return;
        }
        let live = &self.live;
        self.order
            .retain(|(key, stamp)| live.get(key) == Some(stamp));
    }
}
