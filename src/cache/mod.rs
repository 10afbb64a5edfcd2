//! Cache Module
//!
//! Provides fixed-capacity in-memory caches with LRU, segmented LRU and TTL eviction.

mod arena;
mod entry;
mod expiration;
mod lru;
mod slru;
mod stats;
mod traits;


// Re-export public types
pub use entry::CacheEntry;
pub use expiration::ExpirationCache;
pub use lru::LruCache;
pub use slru::{Segment, SlruCache};
pub use stats::CacheStats;
pub use traits::Cache;
