//! Seeded demonstration of LRU eviction

use anyhow::Result;
use chrono::Utc;
use lrucache::{FileInfo, LruCache};
use tracing::info;

const SEED: [(&str, u64); 4] = [
    ("/dir1/f1", 100),
    ("/dir2/f2", 200),
    ("/dir3/f3", 300),
    ("/dir4/f4", 400),
];

pub fn run(capacity: usize) -> Result<()> {
    let mut cache = LruCache::new(capacity)?;
    info!("Cache capacity: {}", capacity);

    for line in exercise(&mut cache) {
        println!("{}", line);
    }
    Ok(())
}

/// Seed the cache, query it, and return the report lines.
fn exercise(cache: &mut LruCache<FileInfo>) -> Vec<String> {
    let now = Utc::now();
    for (path, size) in SEED {
        if let Some((evicted, _)) = cache.put(path, FileInfo::new(path, size, now)) {
            info!("Evicted {}", evicted);
        }
    }

    let mut out = Vec::new();
    let found = cache.get("/dir1/f1").is_some();
    out.push(format!(
        "File /dir1/f1: {}",
        if found { "Found" } else { "Not Found" }
    ));

    if let Some(info) = cache.get("/dir4/f4") {
        out.push(format!("File /dir4/f4 size: {}", info.size));
    }

    let order: Vec<&str> = cache.keys().collect();
    out.push(format!("Recency (most to least): {}", order.join(", ")));
    out
}
