//! LRU Cache Module
//!
//! Fixed-capacity cache with Least Recently Used eviction.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use tracing::{debug, trace};

use crate::cache::arena::LinkedArena;
use crate::cache::{Cache, CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == LRU Cache ==
/// Maps keys to values, evicting the least recently used entry on overflow.
///
/// Entries live in a slot arena whose link order is the recency index:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Both `get` and `put` count as a use. Recency is decided by list position,
/// never by comparing timestamps.
#[derive(Debug)]
pub struct LruCache<K, V> {
    /// Key to arena slot
    index: HashMap<K, usize>,
    /// Entry store ordered by recency
    entries: LinkedArena<CacheEntry<K, V>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new LruCache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        debug!(capacity, "LRU cache created");
        Ok(Self {
            index: HashMap::with_capacity(capacity),
            entries: LinkedArena::with_capacity(capacity),
            capacity,
            stats: CacheStats::new(),
        })
    }

    // == Put ==
    /// Stores a key-value pair and marks it most recently used.
    ///
    /// If the key already exists its value is replaced. If the key is new and
    /// the cache is full, the least recently used entry is evicted first.
    pub fn put(&mut self, key: K, value: V) {
        let now = Instant::now();

        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.entries.get_mut(idx) {
                entry.refresh(value, now);
            }
            self.entries.move_to_front(idx);
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        let idx = self
            .entries
            .push_front(CacheEntry::new(key.clone(), value, now));
        self.index.insert(key, idx);
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// A read here has a write-like side effect: the entry moves to the front
    /// of the recency order and so outlives entries that were not read.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&idx) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.entries.move_to_front(idx);
        let entry = self.entries.get_mut(idx)?;
        entry.timestamp = Instant::now();
        Some(&entry.value)
    }

    // == Contains ==
    /// Checks if a key is present without touching its recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.entries.remove(idx).map(|entry| entry.value)
    }

    // == Iter ==
    /// Iterates over entries from most to least recently used.
    ///
    /// Does not affect recency.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Clear ==
    /// Evicts every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "LRU cache cleared");
        self.index.clear();
        self.entries.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Evict LRU ==
    fn evict_lru(&mut self) {
        if let Some(entry) = self.entries.pop_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            trace!("Evicted least recently used entry");
        }
    }
}

impl<K, V> Cache<K, V> for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        LruCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) {
        LruCache::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        LruCache::stats(self)
    }
}
