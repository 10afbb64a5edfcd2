//! Integration Tests for the cache library
//!
//! Exercises every cache through the public API, including the eviction
//! scenarios the caches are expected to reproduce exactly.

use std::io::Cursor;
use std::thread::sleep;
use std::time::{Duration, Instant};

use mini_cache::replay::{cache_for, parse_trace, replay};
use mini_cache::cache::Segment;
use mini_cache::{Cache, CacheError, Config, ExpirationCache, LruCache, Policy, SlruCache};

// == LRU Scenarios ==

#[test]
fn test_lru_keeps_most_recent_capacity_keys() {
    let mut cache = LruCache::new(10).unwrap();
    assert!(cache.get(&1).is_none());

    for i in 0..20 {
        cache.put(i, i);
    }
    for i in 0..20 {
        if i < 10 {
            assert!(cache.get(&i).is_none(), "key {} should be evicted", i);
        } else {
            assert_eq!(cache.get(&i), Some(&i));
        }
    }
}

#[test]
fn test_lru_update_evicts_in_touch_order() {
    let mut cache = LruCache::new(10).unwrap();

    for i in 0..20 {
        cache.put(i, i);
    }
    for i in 0..20 {
        cache.get(&i);
    }

    // Re-inserting the evicted low keys pushes out 10..19 in touch order,
    // then re-inserting 10..19 pushes out the low keys again
    for i in 0..20 {
        cache.put(i, i % 10);
    }
    for i in 0..20 {
        if i < 10 {
            assert!(cache.get(&i).is_none(), "key {} should be evicted", i);
        } else {
            assert_eq!(cache.get(&i), Some(&(i % 10)));
        }
    }
    assert_eq!(cache.len(), 10);
}

#[test]
fn test_lru_capacity_never_exceeded() {
    let mut cache = LruCache::new(7).unwrap();
    for i in 0..100 {
        cache.put(i % 23, i);
        assert!(cache.len() <= 7);
    }
}

#[test]
fn test_lru_read_extends_lifetime() {
    let mut cache = LruCache::new(3).unwrap();
    cache.put("a", 1);
    cache.put("b", 2);
    cache.put("c", 3);

    cache.get("a");
    cache.put("d", 4);
    cache.put("e", 5);

    assert_eq!(cache.get("a"), Some(&1));
    assert!(cache.get("b").is_none());
    assert!(cache.get("c").is_none());
}

#[test]
fn test_lru_zero_capacity_is_rejected() {
    let result = LruCache::<u32, u32>::new(0);
    assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
}

// == Segmented LRU Scenarios ==

#[test]
fn test_slru_hit_key_is_demoted_then_dropped() {
    let mut cache = SlruCache::new(10).unwrap();
    for i in 0..20 {
        cache.put(i, i);
    }
    for i in 0..15 {
        assert!(!cache.contains(&i), "key {} should be evicted", i);
    }

    // 15 moves to the protected segment
    assert_eq!(cache.get(&15), Some(&15));
    assert_eq!(cache.segment(&15), Some(Segment::Protected));

    // Five new keys hit once each fill protected; 15 goes back to probation
    for i in 20..25 {
        cache.put(i, i);
        assert_eq!(cache.get(&i), Some(&i));
    }
    assert_eq!(cache.segment(&15), Some(Segment::Probationary));

    // Five more new keys push it out
    for i in 30..35 {
        cache.put(i, i);
    }
    assert!(cache.get(&15).is_none());
    assert_eq!(cache.len(), 10);
}

#[test]
fn test_slru_zero_capacity_is_rejected() {
    assert!(matches!(
        SlruCache::<u32, u32>::new(0),
        Err(CacheError::InvalidCapacity(0))
    ));
}

// == Expiration Scenarios ==

#[test]
fn test_expiration_capacity_then_ttl() {
    let mut cache = ExpirationCache::new(5, 2).unwrap();
    assert_eq!(cache.len(), 0);
    cache.put(1, "test".to_string());
    assert_eq!(cache.len(), 1);
    cache.put(2, "bar".to_string());
    assert_eq!(cache.len(), 2);
    assert!(cache.get(&1).is_some());

    for i in 0..10 {
        cache.put(i, i.to_string());
    }
    for i in 0..10 {
        if i < 5 {
            assert!(cache.get(&i).is_none(), "key {} should be evicted", i);
        } else {
            assert_eq!(cache.get(&i), Some(&i.to_string()));
        }
    }

    // Waiting the full TTL expires even the newest write
    sleep(Duration::from_secs(2));
    assert!(cache.get(&9).is_none());
}

#[test]
fn test_expiration_capacity_then_ttl_simulated_clock() {
    let start = Instant::now();
    let mut cache = ExpirationCache::new(5, 2).unwrap();

    for i in 0..10 {
        cache.put_at(i, i, start);
    }
    for i in 0..10 {
        assert_eq!(cache.get_at(&i, start).is_some(), i >= 5);
    }

    let expiry = start + Duration::from_secs(2);
    assert!(cache.get_at(&9, expiry).is_none());
    // The miss swept the whole expired run
    assert!(cache.is_empty());
    assert_eq!(cache.purge_expired_at(expiry), 0);
    assert_eq!(cache.stats().expirations, 5);
}

#[test]
fn test_expiration_invalid_config_is_rejected() {
    assert!(matches!(
        ExpirationCache::<u32, u32>::new(0, 2),
        Err(CacheError::InvalidCapacity(0))
    ));
    assert!(matches!(
        ExpirationCache::<u32, u32>::new(5, 0),
        Err(CacheError::InvalidTtl(_))
    ));
}

#[test]
fn test_expiration_short_ttl_real_clock() {
    let mut cache = ExpirationCache::with_ttl(4, Duration::from_millis(100)).unwrap();
    cache.put("a", 1);
    cache.put("b", 2);

    assert_eq!(cache.get("a"), Some(&1));
    sleep(Duration::from_millis(150));

    // Still resident until the next access sweeps them
    assert_eq!(cache.len(), 2);
    assert!(cache.get("a").is_none());
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.purge_expired(), 0);
    assert_eq!(cache.stats().expirations, 2);
}

// == Shared Contract ==

fn exercise_contract(cache: &mut dyn Cache<u64, u64>) {
    assert!(cache.is_empty());

    let inserted = cache.capacity() + 3;
    for key in 0..inserted as u64 {
        cache.put(key, key * 10);
        assert!(cache.len() <= cache.capacity());
    }
    // Every distinct key is either resident or was evicted
    assert_eq!(cache.stats().evictions as usize + cache.len(), inserted);

    // Misses leave the size untouched
    let len = cache.len();
    for _ in 0..3 {
        assert!(cache.get(&10_000).is_none());
        assert_eq!(cache.len(), len);
    }

    let newest = cache.capacity() as u64 + 2;
    assert_eq!(cache.get(&newest), Some(&(newest * 10)));
    assert_eq!(cache.remove(&newest), Some(newest * 10));
    assert_eq!(cache.len(), len - 1);

    let evictions = cache.stats().evictions;
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().evictions, evictions);
}

#[test]
fn test_both_policies_share_contract() {
    let mut lru: LruCache<u64, u64> = LruCache::new(4).unwrap();
    exercise_contract(&mut lru);

    let mut expiring: ExpirationCache<u64, u64> = ExpirationCache::new(4, 300).unwrap();
    exercise_contract(&mut expiring);

    let mut segmented: SlruCache<u64, u64> = SlruCache::new(4).unwrap();
    exercise_contract(&mut segmented);
}

// == Replay ==

#[test]
fn test_replay_from_trace_text() {
    let trace = "1 a\n2 b\n1 c\n3 d\n1 e\n";
    let keys = parse_trace(Cursor::new(trace)).unwrap();

    let config = Config {
        policy: Policy::Lru,
        capacity: 2,
        ..Config::default()
    };
    let mut cache = cache_for(&config).unwrap();
    let report = replay(&mut *cache, &keys);

    // 1 miss, 2 miss, 1 hit, 3 miss (evicts 2), 1 hit
    assert_eq!(report.requests, 5);
    assert_eq!(report.hits, 2);
    assert_eq!(report.stats.evictions, 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["hits"], 2);
    assert_eq!(json["stats"]["total_entries"], 2);
}

#[test]
fn test_replay_scan_favours_segmented_policy() {
    // A hot pair read twice, then a scan of one-off keys, then the hot pair again
    let mut keys = vec![1, 2, 1, 2];
    keys.extend(100..110);
    keys.extend([1, 2]);

    let hits_for = |policy| {
        let config = Config {
            policy,
            capacity: 4,
            ..Config::default()
        };
        let mut cache = cache_for(&config).unwrap();
        replay(&mut *cache, &keys).hits
    };

    assert_eq!(hits_for(Policy::Lru), 2);
    assert_eq!(hits_for(Policy::Slru), 4);
}
