//! Usage list: entries ordered from most to least recently used
//!
//! Links live in `Entry::prev` / `Entry::next`. Every operation is O(1).

use crate::entry::Arena;

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UsageList {
    pub(crate) head: Option<usize>,
    pub(crate) tail: Option<usize>,
}

impl UsageList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Splice a detached entry in as the new head.
    pub(crate) fn push_front<V>(&mut self, arena: &mut Arena<V>, idx: usize) {
        {
            let entry = arena.get_mut(idx);
            entry.prev = None;
            entry.next = self.head;
        }

        if let Some(head_idx) = self.head {
            arena.get_mut(head_idx).prev = Some(idx);
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Remove `idx` from the list, repairing its neighbours and the ends.
    pub(crate) fn detach<V>(&mut self, arena: &mut Arena<V>, idx: usize) {
        let (prev, next) = {
            let entry = arena.get(idx);
            (entry.prev, entry.next)
        };

        match prev {
            Some(prev_idx) => arena.get_mut(prev_idx).next = next,
            None => self.head = next,
        }

        match next {
            Some(next_idx) => arena.get_mut(next_idx).prev = prev,
            None => self.tail = prev,
        }

        let entry = arena.get_mut(idx);
        entry.prev = None;
        entry.next = None;
    }

    /// Mark `idx` as most recently used.
    pub(crate) fn promote<V>(&mut self, arena: &mut Arena<V>, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(arena, idx);
        self.push_front(arena, idx);
    }

    /// Detach and return the least recently used entry.
    pub(crate) fn pop_back<V>(&mut self, arena: &mut Arena<V>) -> Option<usize> {
        let tail = self.tail?;
        self.detach(arena, tail);
        Some(tail)
    }

    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
    }

    pub(crate) fn iter<'a, V>(&self, arena: &'a Arena<V>) -> Iter<'a, V> {
        Iter {
            arena,
            cursor: self.head,
        }
    }
}

/// Head-to-tail walk over slot indices
pub(crate) struct Iter<'a, V> {
    arena: &'a Arena<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = self.cursor?;
        self.cursor = self.arena.get(idx).next;
        Some(idx)
    }
}
