//! Expiration Cache Module
//!
//! Fixed-capacity cache whose entries expire a fixed TTL after they were
//! last written.
//!
//! Expiry is access-driven: there is no background sweeper. Every `put` and
//! `get` first sweeps the entries whose TTL has elapsed, and `purge_expired`
//! does the same on demand.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::arena::LinkedArena;
use crate::cache::{Cache, CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Expiration Cache ==
/// Maps keys to values that stop being visible `ttl` after their last write.
///
/// Entries live in a slot arena ordered by write time:
/// - Front = Most recently written
/// - Back = Oldest write
///
/// Reads never change an entry's age or position. Since every entry shares
/// the same TTL, expired entries always form a run at the back, which keeps
/// the sweep proportional to the number of entries it removes.
///
/// Methods taking an explicit `now` expect non-decreasing instants across
/// calls; the plain variants use `Instant::now()`.
#[derive(Debug)]
pub struct ExpirationCache<K, V> {
    /// Key to arena slot
    index: HashMap<K, usize>,
    /// Entry store ordered by write time
    entries: LinkedArena<CacheEntry<K, V>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Maximum age before an entry is treated as absent
    ttl: Duration,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> ExpirationCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new ExpirationCache with a TTL given in whole seconds.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero and
    /// `CacheError::InvalidTtl` if `ttl_secs` is zero.
    pub fn new(capacity: usize, ttl_secs: u64) -> Result<Self> {
        Self::with_ttl(capacity, Duration::from_secs(ttl_secs))
    }

    /// Creates a new ExpirationCache with an arbitrary non-zero TTL.
    pub fn with_ttl(capacity: usize, ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl(ttl));
        }

        debug!(capacity, ?ttl, "Expiration cache created");
        Ok(Self {
            index: HashMap::with_capacity(capacity),
            entries: LinkedArena::with_capacity(capacity),
            capacity,
            ttl,
            stats: CacheStats::new(),
        })
    }

    // == Put ==
    /// Stores a key-value pair, resetting its age.
    pub fn put(&mut self, key: K, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Stores a key-value pair as written at `now`.
    ///
    /// Expired entries are reclaimed first. An existing key then gets the new
    /// value, a fresh timestamp and the newest position. A new key arriving at
    /// a full cache evicts the oldest entry whether or not its TTL has elapsed.
    pub fn put_at(&mut self, key: K, value: V, now: Instant) {
        self.purge_expired_at(now);

        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.entries.get_mut(idx) {
                entry.refresh(value, now);
            }
            self.entries.move_to_front(idx);
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }

        let idx = self
            .entries
            .push_front(CacheEntry::new(key.clone(), value, now));
        self.index.insert(key, idx);
    }

    // == Get ==
    /// Retrieves a value by key if it has not expired.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    /// Retrieves a value by key as seen at `now`.
    ///
    /// Expired entries, the requested one included, are removed before the
    /// lookup, so an entry whose age has reached the TTL is reported absent.
    /// A hit does not refresh the entry's age.
    pub fn get_at<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.purge_expired_at(now);

        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.entries.get(idx).map(|entry| &entry.value)
    }

    // == Time To Live ==
    /// Returns how long `key` has left to live, or None if absent or expired.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ttl_remaining_at(key, Instant::now())
    }

    /// Time `key` has left to live as seen at `now`.
    pub fn ttl_remaining_at<Q>(&self, key: &Q, now: Instant) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.get(*self.index.get(key)?)?;
        if entry.is_expired(self.ttl, now) {
            None
        } else {
            Some(entry.ttl_remaining(self.ttl, now))
        }
    }

    // == Remove ==
    /// Removes an entry by key, returning its value even if expired.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.entries.remove(idx).map(|entry| entry.value)
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Removes all entries expired as of `now`.
    ///
    /// Expired entries sit in a run at the back, so the walk stops at the
    /// first live entry and each entry is swept at most once.
    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let mut removed = 0;

        while self
            .entries
            .back()
            .is_some_and(|entry| entry.is_expired(ttl, now))
        {
            if let Some(entry) = self.entries.pop_back() {
                self.index.remove(&entry.key);
                removed += 1;
            }
        }

        if removed > 0 {
            self.stats.record_expirations(removed);
            trace!(removed, "Swept expired entries");
        }
        removed
    }

    // == Length ==
    /// Returns the number of resident entries.
    ///
    /// Entries that expired after the last `put`, `get` or `purge_expired`
    /// are still counted until one of those calls sweeps them.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Clear ==
    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "Expiration cache cleared");
        self.index.clear();
        self.entries.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    // == Evict Oldest ==
    fn evict_oldest(&mut self) {
        if let Some(entry) = self.entries.pop_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            trace!("Evicted oldest entry");
        }
    }
}

impl<K, V> Cache<K, V> for ExpirationCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        ExpirationCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) {
        ExpirationCache::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        ExpirationCache::remove(self, key)
    }

    fn len(&self) -> usize {
        ExpirationCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        ExpirationCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        ExpirationCache::stats(self)
    }
}
