//! TTL LRU Cache - snapshot inspector
//!
//! Loads a cache snapshot, drops whatever expired while it was at rest and
//! prints what is left.
//!
//! ```text
//! ttl_lru_cache [SNAPSHOT_PATH] [--compact]
//! ```
//!
//! Without a path argument `CACHE_SNAPSHOT_PATH` is used. `--compact` writes
//! the purged state back to the same file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru_cache::{Cache, CacheConfig};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut path_arg = None;
    let mut compact = false;
    for arg in std::env::args_os().skip(1) {
        if arg == "--compact" {
            compact = true;
        } else if path_arg.is_none() {
            path_arg = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected argument: {}", arg.to_string_lossy());
        }
    }

    let config = CacheConfig::from_env();
    info!(capacity = config.capacity, "configuration loaded");

    let Some(path) = path_arg.or_else(|| config.snapshot_path.clone()) else {
        bail!("usage: ttl_lru_cache [SNAPSHOT_PATH] [--compact] (or set CACHE_SNAPSHOT_PATH)");
    };

    let cache: Cache<serde_json::Value> =
        Cache::from_config(&config).context("invalid cache configuration")?;
    cache
        .load_from_file(&path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;

    let stats = cache.stats();
    println!("{:#?}", cache);
    println!(
        "entries: {} / {}, expired on load: {}, dropped over capacity: {}",
        stats.total_entries,
        cache.capacity(),
        stats.expirations,
        stats.evictions
    );

    if compact {
        cache
            .save_to_file(&path)
            .with_context(|| format!("failed to rewrite snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot compacted");
    }

    Ok(())
}
