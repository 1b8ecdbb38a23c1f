//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and LRU eviction.

mod concurrent;
mod entry;
mod expiry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use concurrent::Cache;
pub use entry::{current_timestamp_ms, CacheEntry};
pub use expiry::ExpiryIndex;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
