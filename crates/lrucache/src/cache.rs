//! MetadataCache: shared LRU cache in front of filesystem metadata

use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::file_info::{path_key, FileInfo};
use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Thread-safe file metadata cache
///
/// Every cache operation runs under the one lock. Reads reorder the usage
/// list, so there is no shared read path. Keys are the exact UTF-8 text of
/// the path; non-UTF-8 paths are never cached.
pub struct MetadataCache {
    /// LRU cache for hot metadata
    cache: Mutex<LruCache<FileInfo>>,

    /// Cache statistics
    stats: CacheStats,

    /// Cache capacity
    capacity: usize,
}

impl MetadataCache {
    /// Create a new MetadataCache
    ///
    /// # Arguments
    /// * `config` - Capacity and bucket count
    ///
    /// # Returns
    /// * `Result<MetadataCache>` - Empty cache, or the config error
    pub fn new(config: CacheConfig) -> Result<Self> {
        Ok(Self {
            cache: Mutex::new(LruCache::with_config(config)?),
            stats: CacheStats::new(),
            capacity: config.capacity,
        })
    }

    /// Store a record under its path, replacing any previous one
    ///
    /// # Errors
    /// `Error::NonUtf8Path` if the record's path is not valid UTF-8.
    pub fn put(&self, info: FileInfo) -> Result<()> {
        let key = info.key()?.to_string();
        let mut cache = self.cache.lock();
        self.store(&mut cache, &key, info);
        Ok(())
    }

    /// Get a cached record, marking it most recently used
    ///
    /// # Returns
    /// * `Option<FileInfo>` - `None` if the path is not cached
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<FileInfo> {
        let found = match path_key(path.as_ref()) {
            Ok(key) => self.cache.lock().get(key).cloned(),
            Err(_) => None,
        };

        if found.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        found
    }

    /// Get a record from cache or the filesystem
    ///
    /// A miss reads the file's metadata without holding the lock, then
    /// caches it unless another caller stored the path in the meantime.
    ///
    /// # Returns
    /// * `Result<FileInfo>` - Metadata, or the key or I/O error
    pub fn lookup<P: AsRef<Path>>(&self, path: P) -> Result<FileInfo> {
        let path = path.as_ref();
        let key = path_key(path)?;

        if let Some(info) = self.cache.lock().get(key).cloned() {
            self.stats.record_hit();
            return Ok(info);
        }

        self.stats.record_miss();
        debug!(path = %key, "metadata cache miss");
        let info = FileInfo::from_path(path)?;

        let mut cache = self.cache.lock();
        if let Some(existing) = cache.get(key) {
            return Ok(existing.clone());
        }
        self.store(&mut cache, key, info.clone());

        Ok(info)
    }

    /// Drop a path from the cache
    ///
    /// # Returns
    /// * `bool` - Whether the path was cached
    pub fn invalidate<P: AsRef<Path>>(&self, path: P) -> bool {
        match path_key(path.as_ref()) {
            Ok(key) => self.cache.lock().remove(key).is_some(),
            Err(_) => false,
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached paths from most to least recently used
    pub fn recency(&self) -> Vec<String> {
        self.cache.lock().keys().map(str::to_string).collect()
    }

    /// Clear the cache and its statistics
    pub fn clear(&self) {
        self.cache.lock().clear();
        self.stats.reset();
    }

    fn store(&self, cache: &mut LruCache<FileInfo>, key: &str, info: FileInfo) {
        if cache.contains(key) {
            self.stats.record_update();
        } else {
            self.stats.record_insert();
        }

        if let Some((evicted, _)) = cache.put(key, info) {
            self.stats.record_eviction();
            trace!(path = %evicted, "evicted metadata");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::Utc;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn info(path: &str, size: u64) -> FileInfo {
        FileInfo::new(path, size, Utc::now())
    }

    fn cache(capacity: usize) -> MetadataCache {
        MetadataCache::new(CacheConfig::new(capacity)).unwrap()
    }

    #[test]
    fn test_cache_zero_capacity() {
        assert!(MetadataCache::new(CacheConfig::new(0)).is_err());
    }

    #[test]
    fn test_cache_basic() {
        let cache = cache(10);

        cache.put(info("/dir1/f1", 100)).unwrap();
        let got = cache.get("/dir1/f1").unwrap();

        assert_eq!(got.size, 100);
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 0);
        assert_eq!(cache.stats().inserts(), 1);
    }

    #[test]
    fn test_cache_miss() {
        let cache = cache(10);

        assert!(cache.get("/nowhere").is_none());
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_cache_eviction() {
        let cache = cache(3);

        cache.put(info("/dir1/f1", 100)).unwrap();
        cache.put(info("/dir2/f2", 200)).unwrap();
        cache.put(info("/dir3/f3", 300)).unwrap();
        cache.put(info("/dir4/f4", 400)).unwrap();

        assert_eq!(cache.len(), 3);
        assert!(cache.get("/dir1/f1").is_none());
        assert_eq!(cache.get("/dir4/f4").unwrap().size, 400);
        assert_eq!(cache.stats().evictions(), 1);
        assert_eq!(cache.recency()[0], "/dir4/f4");
    }

    #[test]
    fn test_cache_update() {
        let cache = cache(2);

        cache.put(info("/a", 1)).unwrap();
        cache.put(info("/a", 2)).unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/a").unwrap().size, 2);
        assert_eq!(cache.stats().inserts(), 1);
        assert_eq!(cache.stats().updates(), 1);
    }

    #[test]
    fn test_cache_lookup_loads_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, b"hello").unwrap();

        let cache = cache(4);
        let first = cache.lookup(&path).unwrap();
        assert_eq!(first.size, 5);
        assert_eq!(cache.stats().misses(), 1);

        // Served from cache even after the file changes
        fs::write(&path, b"hello world").unwrap();
        let second = cache.lookup(&path).unwrap();
        assert_eq!(second.size, 5);
        assert_eq!(cache.stats().hits(), 1);

        assert!(cache.invalidate(&path));
        assert_eq!(cache.lookup(&path).unwrap().size, 11);
    }

    #[test]
    fn test_cache_lookup_missing_file() {
        let dir = TempDir::new().unwrap();
        let cache = cache(4);

        assert!(cache.lookup(dir.path().join("missing")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_clear() {
        let cache = cache(10);

        cache.put(info("/a", 1)).unwrap();
        cache.put(info("/b", 2)).unwrap();
        cache.get("/a");
        assert_eq!(cache.len(), 2);

        cache.clear();

        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().hits(), 0);
        assert!(!cache.invalidate("/a"));
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = Arc::new(cache(64));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..100u64 {
                        let path = format!("/t{}/f{}", t, i % 8);
                        cache.put(info(&path, i)).unwrap();
                        cache.get(&path);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= cache.capacity());
        assert_eq!(cache.stats().hits(), 400);
        assert_eq!(cache.stats().inserts() + cache.stats().updates(), 400);
    }

    #[test]
    fn test_cache_concurrent_lookups_insert_once() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..4)
            .map(|i| {
                let path = dir.path().join(format!("f{}", i));
                fs::write(&path, vec![b'x'; i + 1]).unwrap();
                path
            })
            .collect();
        let cache = Arc::new(cache(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let paths = paths.clone();
                thread::spawn(move || {
                    for (i, path) in paths.iter().enumerate() {
                        let info = cache.lookup(path).unwrap();
                        assert_eq!(info.size, i as u64 + 1);
                        assert_eq!(&info.path, path);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Racing loaders of one path store it once
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.stats().inserts(), 4);
        assert_eq!(cache.stats().updates(), 0);
        assert_eq!(cache.stats().hits() + cache.stats().misses(), 32);
    }

    #[cfg(unix)]
    #[test]
    fn test_cache_non_utf8_siblings_not_conflated() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let a = dir.path().join(OsStr::from_bytes(b"f\xff"));
        let b = dir.path().join(OsStr::from_bytes(b"f\xfe"));
        fs::write(&a, b"1").unwrap();
        fs::write(&b, b"12345").unwrap();

        let cache = cache(4);
        assert!(matches!(cache.lookup(&a), Err(Error::NonUtf8Path(p)) if p == a));
        assert!(matches!(cache.lookup(&b), Err(Error::NonUtf8Path(p)) if p == b));
        assert!(cache.get(&b).is_none());
        assert!(!cache.invalidate(&a));
        assert!(matches!(
            cache.put(FileInfo::new(a.clone(), 1, Utc::now())),
            Err(Error::NonUtf8Path(_))
        ));
        assert!(cache.is_empty());

        // A UTF-8 sibling is still cached under its own path
        let c = dir.path().join("f");
        fs::write(&c, b"123").unwrap();
        assert_eq!(cache.lookup(&c).unwrap().size, 3);
        assert!(cache.get(&b).is_none());
        assert_eq!(cache.len(), 1);
    }
}
