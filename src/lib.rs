//! Mini Cache - fixed-capacity in-memory caches
//!
//! Provides LRU, segmented LRU and TTL expiration caches with O(1) operations,
//! plus a trace replay harness for measuring hit rates.

pub mod cache;
pub mod config;
pub mod error;
pub mod replay;

pub use cache::{Cache, CacheStats, ExpirationCache, LruCache, SlruCache};
pub use config::{Config, Policy};
pub use error::{CacheError, Result};
