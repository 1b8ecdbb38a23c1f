//! TTL LRU Cache - A bounded in-process cache
//!
//! Combines least-recently-used eviction with per-entry TTL expiration behind a
//! single lock, and persists its full state through versioned snapshots.

pub mod cache;
pub mod config;
pub mod error;
pub mod snapshot;

pub use cache::{Cache, CacheEntry, CacheStats, CacheStore};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
