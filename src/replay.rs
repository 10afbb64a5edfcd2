//! Trace Replay Module
//!
//! Replays a key-access trace against a cache and measures the hit rate.
//! Each access is a `get`; on a miss the key is `put` with a placeholder
//! value, the way a read-through caller would fill the cache.

use std::io::BufRead;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{Cache, CacheStats, ExpirationCache, LruCache, SlruCache};
use crate::config::{Config, Policy};
use crate::error::{CacheError, Result};

// == Replay Report ==
/// Outcome of a trace replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Number of accesses replayed
    pub requests: u64,
    /// Accesses served from the cache
    pub hits: u64,
    /// hits / requests, 0.0 for an empty trace
    pub hit_rate: f64,
    /// Wall time spent replaying, in milliseconds
    pub elapsed_ms: f64,
    /// Replay throughput
    pub requests_per_sec: f64,
    /// Cache counters at the end of the replay
    pub stats: CacheStats,
}

// == Parse Trace ==
/// Reads trace keys, one access per line.
///
/// The first whitespace-separated token of each line is the key; anything
/// after it is ignored, as are blank lines.
///
/// # Errors
/// Returns `CacheError::InvalidTrace` with the 1-based line number when a key
/// is not an unsigned integer, and `CacheError::Io` if reading fails.
pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<u64>> {
    let mut keys = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let key: u64 = token.parse().map_err(|_| CacheError::InvalidTrace {
            line: idx + 1,
            token: token.to_string(),
        })?;
        keys.push(key);
    }

    debug!(entries = keys.len(), "Trace parsed");
    Ok(keys)
}

// == Cache For Config ==
/// Builds the cache selected by `config`.
pub fn cache_for(config: &Config) -> Result<Box<dyn Cache<u64, u64>>> {
    let cache: Box<dyn Cache<u64, u64>> = match config.policy {
        Policy::Lru => Box::new(LruCache::<u64, u64>::new(config.capacity)?),
        Policy::Slru => Box::new(SlruCache::<u64, u64>::new(config.capacity)?),
        Policy::Expiration => Box::new(ExpirationCache::<u64, u64>::new(
            config.capacity,
            config.ttl_secs,
        )?),
    };
    Ok(cache)
}

// == Replay ==
/// Replays `keys` against `cache`, filling it on every miss.
pub fn replay<C>(cache: &mut C, keys: &[u64]) -> ReplayReport
where
    C: Cache<u64, u64> + ?Sized,
{
    let started = Instant::now();
    let mut hits: u64 = 0;

    for &key in keys {
        if cache.get(&key).is_some() {
            hits += 1;
        } else {
            cache.put(key, 0);
        }
    }

    let elapsed = started.elapsed();
    let requests = keys.len() as u64;
    let hit_rate = if requests == 0 {
        0.0
    } else {
        hits as f64 / requests as f64
    };
    let secs = elapsed.as_secs_f64();
    let requests_per_sec = if secs > 0.0 {
        requests as f64 / secs
    } else {
        0.0
    };

    info!(
        "Replayed {} requests: {} hits, hit rate {:.2}%, {:.0} req/s",
        requests,
        hits,
        hit_rate * 100.0,
        requests_per_sec
    );

    ReplayReport {
        requests,
        hits,
        hit_rate,
        elapsed_ms: secs * 1000.0,
        requests_per_sec,
        stats: cache.stats(),
    }
}
