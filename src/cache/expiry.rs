//! Expiry Index Module
//!
//! Per-key absolute deadlines, swept lazily through a min-heap.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Stale heap slots are only compacted past this size.
const COMPACT_THRESHOLD: usize = 64;

// == Expiry Index ==
/// Maps keys to absolute deadlines (Unix milliseconds).
///
/// The heap may hold outdated `(deadline, key)` pairs left behind by
/// overwrites and removals; a pair only counts while it matches `deadlines`.
#[derive(Debug, Default)]
pub struct ExpiryIndex {
    /// Authoritative deadline per key
    deadlines: HashMap<String, u64>,
    /// Earliest deadline on top
    queue: BinaryHeap<Reverse<(u64, String)>>,
}

impl ExpiryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Records (or replaces) the deadline for a key.
    pub fn set(&mut self, key: &str, expires_at: u64) {
        self.deadlines.insert(key.to_string(), expires_at);
        self.queue.push(Reverse((expires_at, key.to_string())));
        self.compact_if_sparse();
    }

    // == Remove ==
    /// Clears the deadline for a key, returning it if one was set.
    pub fn remove(&mut self, key: &str) -> Option<u64> {
        let removed = self.deadlines.remove(key);
        if removed.is_some() {
            self.compact_if_sparse();
        }
        removed
    }

    /// Returns the deadline recorded for a key.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.deadlines.get(key).copied()
    }

    // == Drain Expired ==
    /// Removes and returns every key whose deadline is at or before `now`.
    pub fn drain_expired(&mut self, now: u64) -> Vec<String> {
        let mut expired = Vec::new();

        while self
            .queue
            .peek()
            .is_some_and(|Reverse((deadline, _))| *deadline <= now)
        {
            let Some(Reverse((deadline, key))) = self.queue.pop() else {
                break;
            };
            if self.deadlines.get(&key) == Some(&deadline) {
                self.deadlines.remove(&key);
                expired.push(key);
            }
        }

        expired
    }

    /// Iterates `(key, deadline)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.deadlines.iter().map(|(key, at)| (key.as_str(), *at))
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Rebuilds the heap once outdated pairs outnumber live deadlines.
    fn compact_if_sparse(&mut self) {
        if self.queue.len() <= COMPACT_THRESHOLD || self.queue.len() <= 2 * self.deadlines.len() {
            return;
        }
        self.queue = self
            .deadlines
            .iter()
            .map(|(key, at)| Reverse((*at, key.clone())))
            .collect();
    }
}
