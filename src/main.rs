//! Cache Replay - measures cache hit rates against an access trace
//!
//! Reads one key per line from `TRACE_FILE` (or stdin), replays the accesses
//! against the configured cache and prints a JSON report to stdout.

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::replay::{cache_for, parse_trace, replay};
use mini_cache::Config;

/// Main entry point for the trace replay tool.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Parse the access trace
/// 4. Build the configured cache and replay the trace
/// 5. Print the report as JSON
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info,cache_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting cache trace replay");

    let config = Config::from_env();
    info!(
        "Configuration loaded: policy={:?}, capacity={}, ttl={}s",
        config.policy, config.capacity, config.ttl_secs
    );

    let keys = match &config.trace_path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open trace file {}", path.display()))?;
            parse_trace(BufReader::new(file))
        }
        None => parse_trace(io::stdin().lock()),
    }
    .context("Failed to read trace")?;
    info!("Loaded {} trace entries", keys.len());

    let mut cache = cache_for(&config).context("Invalid cache configuration")?;
    let report = replay(&mut *cache, &keys);

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );
    Ok(())
}
