//! Segmented LRU Cache Module
//!
//! Fixed-capacity cache that splits its entries into a probationary and a
//! protected segment, so a single scan of one-off keys cannot flush entries
//! that have been hit before.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

use tracing::{debug, trace};

use crate::cache::arena::LinkedArena;
use crate::cache::{Cache, CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Segment ==
/// Which half of a segmented cache holds an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// New entries, evicted from the back on overflow
    Probationary,
    /// Entries hit at least once since they were last demoted
    Protected,
}

/// Position of an entry: segment plus arena slot.
#[derive(Debug, Clone, Copy)]
struct Location {
    segment: Segment,
    idx: usize,
}

// == Segmented LRU Cache ==
/// Two recency lists sharing one index.
///
/// - A new key enters the front of the probationary segment. When that
///   segment overflows, its back entry is evicted.
/// - A hit on a probationary entry moves it to the front of the protected
///   segment. When that segment overflows, its back entry is demoted to the
///   front of the probationary segment instead of being dropped.
/// - A hit on a protected entry moves it to the protected front.
///
/// The protected segment holds `capacity / 2` entries and the probationary
/// segment the rest, so a capacity of one still admits an entry.
#[derive(Debug)]
pub struct SlruCache<K, V> {
    /// Key to segment and arena slot
    index: HashMap<K, Location>,
    /// Entries seen once, most recent first
    probation: LinkedArena<CacheEntry<K, V>>,
    /// Entries hit again, most recent first
    protected: LinkedArena<CacheEntry<K, V>>,
    capacity: usize,
    protected_capacity: usize,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> SlruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new SlruCache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidCapacity` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        let protected_capacity = capacity / 2;
        debug!(capacity, protected_capacity, "Segmented LRU cache created");
        Ok(Self {
            index: HashMap::with_capacity(capacity),
            probation: LinkedArena::with_capacity(capacity - protected_capacity),
            protected: LinkedArena::with_capacity(protected_capacity),
            capacity,
            protected_capacity,
            stats: CacheStats::new(),
        })
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// An existing key counts as a hit and is promoted before its value is
    /// replaced. A new key goes to the probationary front, evicting the
    /// probationary back if that segment is full.
    pub fn put(&mut self, key: K, value: V) {
        let now = Instant::now();

        if let Some(&location) = self.index.get(&key) {
            self.promote(location, now);
            if let Some(entry) = self.entry_mut(&key) {
                entry.refresh(value, now);
            }
            return;
        }

        let idx = self
            .probation
            .push_front(CacheEntry::new(key.clone(), value, now));
        self.index.insert(
            key,
            Location {
                segment: Segment::Probationary,
                idx,
            },
        );

        if self.probation.len() > self.probation_capacity() {
            self.evict_probationary();
        }
    }

    // == Get ==
    /// Retrieves a value by key and promotes the entry.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&location) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.promote(location, Instant::now());

        // Promotion may have moved the entry between segments
        let location = *self.index.get(key)?;
        self.arena(location.segment)
            .get(location.idx)
            .map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks if a key is present without promoting it.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the segment currently holding `key`.
    pub fn segment<Q>(&self, key: &Q) -> Option<Segment>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|location| location.segment)
    }

    // == Remove ==
    /// Removes an entry from whichever segment holds it.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let location = self.index.remove(key)?;
        self.arena_mut(location.segment)
            .remove(location.idx)
            .map(|entry| entry.value)
    }

    // == Iter ==
    /// Iterates over protected entries, then probationary ones, each from
    /// most to least recently used. Does not promote.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.protected
            .iter()
            .chain(self.probation.iter())
            .map(|entry| (&entry.key, &entry.value))
    }

    pub fn len(&self) -> usize {
        self.probation.len() + self.protected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn protected_capacity(&self) -> usize {
        self.protected_capacity
    }

    pub fn probation_capacity(&self) -> usize {
        self.capacity - self.protected_capacity
    }

    // == Clear ==
    /// Evicts every entry from both segments. Statistics counters are kept.
    pub fn clear(&mut self) {
        debug!(entries = self.len(), "Segmented LRU cache cleared");
        self.index.clear();
        self.probation.clear();
        self.protected.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    fn arena(&self, segment: Segment) -> &LinkedArena<CacheEntry<K, V>> {
        match segment {
            Segment::Probationary => &self.probation,
            Segment::Protected => &self.protected,
        }
    }

    fn arena_mut(&mut self, segment: Segment) -> &mut LinkedArena<CacheEntry<K, V>> {
        match segment {
            Segment::Probationary => &mut self.probation,
            Segment::Protected => &mut self.protected,
        }
    }

    fn entry_mut(&mut self, key: &K) -> Option<&mut CacheEntry<K, V>> {
        let location = *self.index.get(key)?;
        self.arena_mut(location.segment).get_mut(location.idx)
    }

    // == Promote ==
    /// Moves a hit entry to the protected front, demoting on overflow.
    fn promote(&mut self, location: Location, now: Instant) {
        let idx = match location.segment {
            Segment::Protected => {
                self.protected.move_to_front(location.idx);
                location.idx
            }
            Segment::Probationary => {
                let Some(entry) = self.probation.remove(location.idx) else {
                    return;
                };
                let idx = self.protected.push_front(entry);
                self.relocate(Segment::Protected, idx);
                idx
            }
        };

        if let Some(entry) = self.protected.get_mut(idx) {
            entry.timestamp = now;
        }

        if self.protected.len() > self.protected_capacity {
            self.demote_protected();
        }
    }

    // == Demote ==
    fn demote_protected(&mut self) {
        if let Some(entry) = self.protected.pop_back() {
            let idx = self.probation.push_front(entry);
            self.relocate(Segment::Probationary, idx);
            trace!("Demoted protected entry to probation");
        }
    }

    /// Points the index at the entry now stored in `segment` slot `idx`.
    fn relocate(&mut self, segment: Segment, idx: usize) {
        let arena = match segment {
            Segment::Probationary => &self.probation,
            Segment::Protected => &self.protected,
        };
        if let Some(entry) = arena.get(idx) {
            if let Some(location) = self.index.get_mut(&entry.key) {
                *location = Location { segment, idx };
            }
        }
    }

    // == Evict Probationary ==
    fn evict_probationary(&mut self) {
        if let Some(entry) = self.probation.pop_back() {
            self.index.remove(&entry.key);
            self.stats.record_eviction();
            trace!("Evicted probationary entry");
        }
    }
}

impl<K, V> Cache<K, V> for SlruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        SlruCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) {
        SlruCache::put(self, key, value)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        SlruCache::remove(self, key)
    }

    fn len(&self) -> usize {
        SlruCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        SlruCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        SlruCache::stats(self)
    }
}
