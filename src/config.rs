//! Configuration Module
//!
//! Loads trace replay settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

// == Eviction Policy ==
/// Which cache implementation a replay runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    /// Capacity-only, least-recently-used eviction
    #[default]
    Lru,
    /// Probationary and protected LRU segments
    Slru,
    /// Capacity plus time-to-live eviction
    Expiration,
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(Policy::Lru),
            "slru" | "s_lru" | "segmented" => Ok(Policy::Slru),
            "expiration" | "ttl" => Ok(Policy::Expiration),
            other => Err(format!("unknown cache policy: {}", other)),
        }
    }
}

/// Replay configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Eviction policy to replay against
    pub policy: Policy,
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// TTL in seconds (expiration policy only)
    pub ttl_secs: u64,
    /// Trace file to read; stdin when unset
    pub trace_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_POLICY` - `lru`, `slru` or `expiration` (default: lru)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL` - TTL in seconds (default: 300)
    /// - `TRACE_FILE` - Path of the access trace (default: stdin)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            policy: env::var("CACHE_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.policy),
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            ttl_secs: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_secs),
            trace_path: env::var_os("TRACE_FILE").map(PathBuf::from),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: Policy::Lru,
            capacity: 1000,
            ttl_secs: 300,
            trace_path: None,
        }
    }
}
