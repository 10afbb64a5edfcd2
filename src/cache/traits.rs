//! Cache Trait Module
//!
//! The operations shared by every eviction policy, so callers can pick a
//! policy at runtime or stay generic over it.

use crate::cache::CacheStats;

// == Cache Trait ==
/// Fixed-capacity key-value cache.
///
/// Misses, expiries and evictions are ordinary outcomes: `get` reports them as
/// `None` and `put` never fails. Implementations are not internally
/// synchronized; wrap an instance in a single lock to share it.
///
/// # Example
/// ```
/// use mini_cache::cache::{Cache, LruCache};
///
/// fn warm<C: Cache<u64, String> + ?Sized>(cache: &mut C, data: &[(u64, &str)]) {
///     for (key, value) in data {
///         cache.put(*key, value.to_string());
///     }
/// }
///
/// let mut cache: LruCache<u64, String> = LruCache::new(2).unwrap();
/// warm(&mut cache, &[(1, "one"), (2, "two"), (3, "three")]);
/// assert_eq!(cache.len(), 2);
/// assert!(cache.get(&1).is_none());
/// ```
pub trait Cache<K, V> {
    /// Looks up `key`. The returned reference lives until the next mutation.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Inserts or replaces `key`, evicting as needed to stay within capacity.
    fn put(&mut self, key: K, value: V);

    /// Deletes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Number of resident entries. Time-based caches may still count
    /// entries that expired since their last sweep.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries, fixed at construction.
    fn capacity(&self) -> usize;

    /// Drops every entry.
    fn clear(&mut self);

    /// Snapshot of the performance counters.
    fn stats(&self) -> CacheStats;
}
