//! Entry records and the slot arena that owns them
//!
//! Links between entries are slot indices, never references. An entry is
//! destroyed only through [`Arena::release`].

/// One cached key/value pair
pub(crate) struct Entry<V> {
    pub(crate) key: Box<str>,
    pub(crate) value: V,
    /// Bucket the key hashes to, cached at insert time
    pub(crate) bucket: usize,
    /// Toward the head (more recently used)
    pub(crate) prev: Option<usize>,
    /// Toward the tail (less recently used)
    pub(crate) next: Option<usize>,
    /// Next entry in the same bucket chain
    pub(crate) hnext: Option<usize>,
}

impl<V> Entry<V> {
    pub(crate) fn new(key: Box<str>, value: V, bucket: usize) -> Self {
        Self {
            key,
            value,
            bucket,
            prev: None,
            next: None,
            hnext: None,
        }
    }
}

/// Slot storage for entries with a free list
pub(crate) struct Arena<V> {
    slots: Vec<Option<Entry<V>>>,
    free_list: Vec<usize>,
}

impl<V> Arena<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Store `entry`, reusing a freed slot when one exists.
    pub(crate) fn alloc(&mut self, entry: Entry<V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            debug_assert!(self.slots[idx].is_none());
            self.slots[idx] = Some(entry);
            idx
        } else {
            self.slots.push(Some(entry));
            self.slots.len() - 1
        }
    }

    /// Take the entry out of `idx` and return the slot to the free list.
    ///
    /// The caller must already have unlinked it from the index and the list.
    pub(crate) fn release(&mut self, idx: usize) -> Entry<V> {
        let entry = self.slots[idx]
            .take()
            .unwrap_or_else(|| panic!("release of vacant slot {}", idx));
        self.free_list.push(idx);
        entry
    }

    /// Drop every entry.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    /// Number of occupied slots
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub(crate) fn get(&self, idx: usize) -> &Entry<V> {
        self.slots[idx]
            .as_ref()
            .unwrap_or_else(|| panic!("dangling slot {}", idx))
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut Entry<V> {
        self.slots[idx]
            .as_mut()
            .unwrap_or_else(|| panic!("dangling slot {}", idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: u32) -> Entry<u32> {
        Entry::new(key.into(), value, 0)
    }

    #[test]
    fn test_alloc_and_get() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.alloc(entry("a", 1));
        let b = arena.alloc(entry("b", 2));

        assert_ne!(a, b);
        assert_eq!(&*arena.get(a).key, "a");
        assert_eq!(arena.get(b).value, 2);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn test_release_reuses_slot() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.alloc(entry("a", 1));
        arena.alloc(entry("b", 2));

        let released = arena.release(a);
        assert_eq!(released.value, 1);
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(entry("c", 3));
        assert_eq!(c, a);
        assert_eq!(arena.live(), 2);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = Arena::with_capacity(1);
        let a = arena.alloc(entry("a", 1));
        arena.get_mut(a).value = 10;
        assert_eq!(arena.get(a).value, 10);
    }

    #[test]
    fn test_clear() {
        let mut arena = Arena::with_capacity(2);
        let a = arena.alloc(entry("a", 1));
        arena.alloc(entry("b", 2));
        arena.release(a);
        arena.clear();
        assert_eq!(arena.live(), 0);
    }

    #[test]
    #[should_panic(expected = "release of vacant slot")]
    fn test_double_release_panics() {
        let mut arena = Arena::with_capacity(1);
        let a = arena.alloc(entry("a", 1));
        arena.release(a);
        arena.release(a);
    }
}
