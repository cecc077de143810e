//! Bucket hashing
//!
//! The default hasher is DJB2 (`h * 33 + byte`, seeded with 5381). It is
//! deterministic across runs, so bucket placement is reproducible. Any other
//! `BuildHasher` (e.g. `ahash::RandomState`) can be plugged into the engine.

use std::hash::{BuildHasher, Hash, Hasher};

const DJB2_SEED: u32 = 5381;

/// DJB2 string hasher
#[derive(Debug, Clone, Copy)]
pub struct Djb2Hasher {
    hash: u32,
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self { hash: DJB2_SEED }
    }
}

impl Hasher for Djb2Hasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = (self.hash << 5).wrapping_add(self.hash).wrapping_add(b as u32);
        }
    }

    fn finish(&self) -> u64 {
        self.hash as u64
    }
}

/// `BuildHasher` for [`Djb2Hasher`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Djb2State;

impl BuildHasher for Djb2State {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Djb2Hasher {
        Djb2Hasher::default()
    }
}

/// Map `key` to a bucket in `0..buckets`.
pub(crate) fn bucket_of<S: BuildHasher>(state: &S, key: &str, buckets: usize) -> usize {
    debug_assert!(buckets > 0);
    let mut hasher = state.build_hasher();
    key.hash(&mut hasher);
    (hasher.finish() % buckets as u64) as usize
}
