//! Cache construction parameters

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Capacity and bucket-table sizing for a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of live entries
    pub capacity: usize,

    /// Length of the bucket table; `None` means "same as capacity"
    #[serde(default)]
    pub buckets: Option<usize>,
}

impl CacheConfig {
    /// Config with the bucket table sized to `capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buckets: None,
        }
    }

    /// Decouple the bucket table length from capacity
    pub fn with_buckets(mut self, buckets: usize) -> Self {
        self.buckets = Some(buckets);
        self
    }

    /// Effective bucket table length
    pub fn bucket_count(&self) -> usize {
        self.buckets.unwrap_or(self.capacity)
    }

    /// Reject zero capacity or a zero-length bucket table
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if self.bucket_count() == 0 {
            return Err(Error::ZeroBuckets);
        }
        Ok(())
    }
}
