//! Metadata lookups through the shared cache

use std::path::PathBuf;

use anyhow::{Context, Result};
use lrucache::{CacheConfig, FileInfo, MetadataCache, StatsSnapshot};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct Report {
    files: Vec<FileInfo>,
    missing: Vec<PathBuf>,
    cached: usize,
    capacity: usize,
    stats: StatsSnapshot,
}

pub fn run(config: CacheConfig, paths: &[PathBuf], passes: usize, json: bool) -> Result<()> {
    let cache = MetadataCache::new(config).context("invalid cache configuration")?;
    info!(
        "Cache capacity: {}, buckets: {}",
        config.capacity,
        config.bucket_count()
    );

    let report = collect(&cache, paths, passes);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for file in &report.files {
        println!(
            "{}\t{}\t{}",
            file.path.display(),
            file.size,
            file.accessed.to_rfc3339()
        );
    }
    for path in &report.missing {
        println!("{}\tNot Found", path.display());
    }
    println!(
        "cached {}/{}  hits {}  misses {}  evictions {}  hit ratio {:.2}",
        report.cached,
        report.capacity,
        report.stats.hits,
        report.stats.misses,
        report.stats.evictions,
        report.stats.hit_ratio
    );
    Ok(())
}

/// Look every path up `passes` times; the last pass is reported.
fn collect(cache: &MetadataCache, paths: &[PathBuf], passes: usize) -> Report {
    let mut files = Vec::new();
    let mut missing = Vec::new();

    for pass in 0..passes.max(1) {
        let last = pass + 1 >= passes.max(1);
        for path in paths {
            match cache.lookup(path) {
                Ok(file) if last => files.push(file),
                Ok(_) => {}
                Err(e) => {
                    if last {
                        warn!("{}: {}", path.display(), e);
                        missing.push(path.clone());
                    }
                }
            }
        }
    }

    Report {
        files,
        missing,
        cached: cache.len(),
        capacity: cache.capacity(),
        stats: cache.stats().snapshot(),
    }
}
