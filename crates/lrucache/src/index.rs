//! Chained hash index over arena slots
//!
//! One chain head per bucket. Chains are threaded through `Entry::hnext`.
//! Lookup cost is the chain length; there is no rehashing.

use crate::entry::Arena;

pub(crate) struct BucketIndex {
    heads: Vec<Option<usize>>,
}

impl BucketIndex {
    pub(crate) fn new(buckets: usize) -> Self {
        Self {
            heads: vec![None; buckets],
        }
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    /// Walk the chain of `bucket` for an exact key match.
    pub(crate) fn find<V>(&self, arena: &Arena<V>, bucket: usize, key: &str) -> Option<usize> {
        let mut cursor = self.heads[bucket];
        while let Some(idx) = cursor {
            let entry = arena.get(idx);
            if &*entry.key == key {
                return Some(idx);
            }
            cursor = entry.hnext;
        }
        None
    }

    /// Push `idx` onto the head of its bucket chain.
    pub(crate) fn link<V>(&mut self, arena: &mut Arena<V>, idx: usize) {
        let entry = arena.get_mut(idx);
        let bucket = entry.bucket;
        entry.hnext = self.heads[bucket];
        self.heads[bucket] = Some(idx);
    }

    /// Splice `idx` out of its bucket chain. Returns `false` if it was not there.
    pub(crate) fn unlink<V>(&mut self, arena: &mut Arena<V>, idx: usize) -> bool {
        let (bucket, hnext) = {
            let entry = arena.get(idx);
            (entry.bucket, entry.hnext)
        };

        if self.heads[bucket] == Some(idx) {
            self.heads[bucket] = hnext;
            arena.get_mut(idx).hnext = None;
            return true;
        }

        let mut cursor = self.heads[bucket];
        while let Some(cur) = cursor {
            let next = arena.get(cur).hnext;
            if next == Some(idx) {
                arena.get_mut(cur).hnext = hnext;
                arena.get_mut(idx).hnext = None;
                return true;
            }
            cursor = next;
        }
        false
    }

    pub(crate) fn clear(&mut self) {
        self.heads.iter_mut().for_each(|head| *head = None);
    }

    #[cfg(test)]
    pub(crate) fn head(&self, bucket: usize) -> Option<usize> {
        self.heads[bucket]
    }

    /// Length of the chain in `bucket`
    #[cfg(test)]
    pub(crate) fn chain_len<V>(&self, arena: &Arena<V>, bucket: usize) -> usize {
        let mut len = 0;
        let mut cursor = self.heads[bucket];
        while let Some(idx) = cursor {
            len += 1;
            cursor = arena.get(idx).hnext;
        }
        len
    }
}
