//! LRU (Least Recently Used) cache engine
//!
//! A chained hash index and an intrusive usage list share one arena of
//! entries. Both structures store slot indices; an entry leaves both before
//! its slot is released.

use std::fmt;
use std::hash::BuildHasher;

use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::entry::{Arena, Entry};
use crate::error::Result;
use crate::hash::{bucket_of, Djb2State};
use crate::index::BucketIndex;
use crate::list::UsageList;

/// LRU cache with fixed capacity and string keys
///
/// Not synchronized: `get` reorders entries, so shared use needs a single
/// exclusive lock around every call (see [`MetadataCache`](crate::MetadataCache)).
pub struct LruCache<V, S = Djb2State> {
    arena: Arena<V>,
    index: BucketIndex,
    list: UsageList,
    hasher: S,
    capacity: usize,
    len: usize,
}

impl<V> LruCache<V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// The bucket table has `capacity` chains.
    ///
    /// # Errors
    /// `Error::ZeroCapacity` if `capacity == 0`.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Create a cache from an explicit config using the DJB2 bucket hasher.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        Self::with_hasher(config, Djb2State)
    }
}

impl<V, S: BuildHasher> LruCache<V, S> {
    /// Create a cache with a custom bucket hasher.
    ///
    /// # Arguments
    /// * `config` - Capacity and bucket count
    /// * `hasher` - Any `BuildHasher`, e.g. `ahash::RandomState`
    ///
    /// # Returns
    /// * `Result<LruCache>` - An empty cache, or the config error
    pub fn with_hasher(config: CacheConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        let buckets = config.bucket_count();
        debug!(capacity = config.capacity, buckets, "creating lru cache");

        Ok(Self {
            arena: Arena::with_capacity(config.capacity),
            index: BucketIndex::new(buckets),
            list: UsageList::new(),
            hasher,
            capacity: config.capacity,
            len: 0,
        })
    }

    /// Get a value, marking it most recently used
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = self.find(key)?;
        self.list.promote(&mut self.arena, idx);
        Some(&self.arena.get(idx).value)
    }

    /// Get a mutable value, marking it most recently used
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.find(key)?;
        self.list.promote(&mut self.arena, idx);
        Some(&mut self.arena.get_mut(idx).value)
    }

    /// Get a value without touching its recency
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.find(key).map(|idx| &self.arena.get(idx).value)
    }

    /// Check for a key without touching its recency
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Insert or update a key-value pair
    ///
    /// An existing key has its value replaced in place and becomes most
    /// recently used; nothing is evicted. A new key on a full cache first
    /// evicts the least recently used entry, which is returned.
    pub fn put(&mut self, key: &str, value: V) -> Option<(String, V)> {
        let bucket = self.bucket(key);

        if let Some(idx) = self.index.find(&self.arena, bucket, key) {
            self.arena.get_mut(idx).value = value;
            self.list.promote(&mut self.arena, idx);
            return None;
        }

        let evicted = if self.len >= self.capacity {
            self.evict()
        } else {
            None
        };

        let idx = self.arena.alloc(Entry::new(key.into(), value, bucket));
        self.index.link(&mut self.arena, idx);
        self.list.push_front(&mut self.arena, idx);
        self.len += 1;

        evicted
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.find(key)?;
        self.list.detach(&mut self.arena, idx);
        let (_, value) = self.destroy(idx);
        Some(value)
    }

    /// Drop every entry; capacity and bucket table length are kept
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.list.clear();
        self.len = 0;
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the bucket table
    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    /// Entries from most to least recently used. Does not touch recency.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.list.iter(&self.arena).map(move |idx| {
            let entry = self.arena.get(idx);
            (&*entry.key, &entry.value)
        })
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(key, _)| key)
    }

    fn bucket(&self, key: &str) -> usize {
        bucket_of(&self.hasher, key, self.index.bucket_count())
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.index.find(&self.arena, self.bucket(key), key)
    }

    fn evict(&mut self) -> Option<(String, V)> {
        let idx = self.list.pop_back(&mut self.arena)?;
        let (key, value) = self.destroy(idx);
        trace!(key = %key, "evicted least recently used entry");
        Some((key, value))
    }

    /// Unlink an entry that is already off the usage list and free its slot.
    fn destroy(&mut self, idx: usize) -> (String, V) {
        let unlinked = self.index.unlink(&mut self.arena, idx);
        assert!(unlinked, "entry in slot {} missing from its bucket chain", idx);

        let entry = self.arena.release(idx);
        self.len -= 1;
        (entry.key.into_string(), entry.value)
    }
}

impl<V: fmt::Debug, S: BuildHasher> fmt::Debug for LruCache<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<V, S: BuildHasher> LruCache<V, S> {
    /// Panic unless index, list, and size agree.
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        assert!(self.len <= self.capacity, "size exceeds capacity");
        assert_eq!(self.arena.live(), self.len, "arena and size disagree");
        assert_eq!(self.list.head.is_none(), self.len == 0);
        assert_eq!(self.list.tail.is_none(), self.len == 0);

        // Usage list: doubly consistent, acyclic, ends well-formed
        let mut listed = HashSet::new();
        let mut prev = None;
        let mut cursor = self.list.head;
        while let Some(idx) = cursor {
            assert!(listed.insert(idx), "cycle in usage list");
            let entry = self.arena.get(idx);
            assert_eq!(entry.prev, prev, "broken back-link at slot {}", idx);
            prev = Some(idx);
            cursor = entry.next;
        }
        assert_eq!(self.list.tail, prev);
        assert_eq!(listed.len(), self.len);

        // Index: every chained entry is listed, keys unique, buckets correct
        let mut chained = HashSet::new();
        let mut keys = HashSet::new();
        for bucket in 0..self.index.bucket_count() {
            let mut cursor = self.index.head(bucket);
            while let Some(idx) = cursor {
                let entry = self.arena.get(idx);
                assert!(chained.insert(idx), "cycle in bucket chain");
                assert!(keys.insert(entry.key.clone()), "duplicate key");
                assert_eq!(entry.bucket, bucket);
                assert_eq!(self.bucket(&entry.key), bucket);
                cursor = entry.hnext;
            }
        }
        assert_eq!(chained, listed);
    }
}
