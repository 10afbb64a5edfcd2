//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with age tracking.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with its key, value and timestamp.
///
/// The timestamp means "last touched" in the LRU cache and "last written" in
/// the expiration cache.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key, kept alongside the value so eviction can clear the index
    pub key: K,
    /// The stored value
    pub value: V,
    /// Monotonic timestamp of the last touch or write
    pub timestamp: Instant,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with `now`.
    pub fn new(key: K, value: V, now: Instant) -> Self {
        Self {
            key,
            value,
            timestamp: now,
        }
    }

    // == Age ==
    /// Time elapsed between the entry's timestamp and `now`.
    ///
    /// Saturates to zero if `now` precedes the timestamp.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.timestamp)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is already
    /// expired.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) >= ttl
    }

    // == Time To Live ==
    /// Returns the time left before the entry expires, zero once expired.
    pub fn ttl_remaining(&self, ttl: Duration, now: Instant) -> Duration {
        ttl.saturating_sub(self.age(now))
    }

    // == Refresh ==
    /// Replaces the value and resets the timestamp.
    pub fn refresh(&mut self, value: V, now: Instant) {
        self.value = value;
        self.timestamp = now;
    }
}
