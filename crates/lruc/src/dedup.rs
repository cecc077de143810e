//! Parallel unique-integer scan
//!
//! The input is split into line-aligned byte ranges, one per worker. Values
//! land in a set sharded by hash, one lock per shard.

use std::collections::HashSet;
use std::fs;
use std::hash::BuildHasher;
use std::ops::Range;
use std::path::Path;
use std::thread;

use ahash::RandomState;
use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Hash-sharded set of integers
pub struct ShardedSet {
    shards: Vec<Mutex<HashSet<i64, RandomState>>>,
    hasher: RandomState,
}

impl ShardedSet {
    pub fn new(shards: usize) -> Self {
        let shards = shards.max(1);
        Self {
            shards: (0..shards)
                .map(|_| Mutex::new(HashSet::with_hasher(RandomState::new())))
                .collect(),
            hasher: RandomState::new(),
        }
    }

    /// Returns `true` if the value was not present.
    pub fn insert(&self, value: i64) -> bool {
        let shard = (self.hasher.hash_one(value) % self.shards.len() as u64) as usize;
        self.shards[shard].lock().insert(value)
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn into_sorted_vec(self) -> Vec<i64> {
        let mut values: Vec<i64> = self
            .shards
            .into_iter()
            .flat_map(|s| s.into_inner())
            .collect();
        values.sort_unstable();
        values
    }
}

/// Split `data` into at most `parts` ranges that start at line boundaries.
fn split_ranges(data: &[u8], parts: usize) -> Vec<Range<usize>> {
    let parts = parts.max(1);
    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;

    for i in 1..=parts {
        if start >= data.len() {
            break;
        }
        let end = if i == parts {
            data.len()
        } else {
            let target = (data.len() * i / parts).max(start);
            match data[target..].iter().position(|&b| b == b'\n') {
                Some(offset) => target + offset + 1,
                None => data.len(),
            }
        };
        ranges.push(start..end);
        start = end;
    }
    ranges
}

/// Insert every integer token of `chunk`. Non-integer tokens are skipped.
fn scan_chunk(chunk: &[u8], set: &ShardedSet) -> usize {
    let mut seen = 0;
    for token in chunk.split(|b| b.is_ascii_whitespace()) {
        if token.is_empty() {
            continue;
        }
        if let Some(value) = std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
        {
            set.insert(value);
            seen += 1;
        }
    }
    seen
}

/// Scan `data` with `threads` workers.
pub fn unique(data: &[u8], threads: usize, shards: usize) -> ShardedSet {
    let set = ShardedSet::new(shards);
    let ranges = split_ranges(data, threads);
    debug!(ranges = ranges.len(), "scanning");

    thread::scope(|s| {
        for range in ranges {
            let set = &set;
            let chunk = &data[range.clone()];
            s.spawn(move || {
                let seen = scan_chunk(chunk, set);
                debug!(start = range.start, end = range.end, seen, "chunk done");
            });
        }
    });

    set
}

pub fn run(file: &Path, threads: usize, shards: usize, print: bool) -> Result<()> {
    if threads == 0 {
        bail!("thread count must be greater than 0");
    }
    let data = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    info!("Scanning {} ({} bytes) with {} threads", file.display(), data.len(), threads);

    let set = unique(&data, threads, shards);

    if print {
        let values = set.into_sorted_vec();
        println!("Unique numbers:");
        for value in &values {
            println!("{}", value);
        }
        println!("Total unique numbers: {}", values.len());
    } else {
        println!("Total unique numbers: {}", set.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_split_ranges_cover_input() {
        let data = b"1 2 3\n4 5\n6\n7 8 9 10\n";
        for parts in 1..8 {
            let ranges = split_ranges(data, parts);
            assert!(ranges.len() <= parts);
            assert_eq!(ranges.first().unwrap().start, 0);
            assert_eq!(ranges.last().unwrap().end, data.len());
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert_eq!(data[pair[0].end - 1], b'\n');
            }
        }
    }

    #[test]
    fn test_split_ranges_empty() {
        assert!(split_ranges(b"", 4).is_empty());
    }

    #[test]
    fn test_unique_counts() {
        let data = b"5 3 5\n-1 3 7\n7 7 7\n42\tfoo 5\n";
        for threads in 1..6 {
            let set = unique(data, threads, 4);
            assert_eq!(set.into_sorted_vec(), vec![-1, 3, 5, 7, 42]);
        }
    }

    #[test]
    fn test_unique_many_values() {
        let data: String = (0..5000).map(|i| format!("{} {}\n", i % 1000, i)).collect();
        let set = unique(data.as_bytes(), 4, 16);
        assert_eq!(set.len(), 5000);
    }

    #[test]
    fn test_sharded_set_insert() {
        let set = ShardedSet::new(0);
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_run_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "1 2 2 3\n").unwrap();
        assert!(run(file.path(), 2, 8, false).is_ok());
        assert!(run(file.path(), 0, 8, false).is_err());
    }
}
