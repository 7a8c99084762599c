//! Slot arena backing the cache entry nodes.
//!
//! Nodes are stored in a `Vec` and addressed by [`SlotId`]. Freed slots are
//! recycled through a free list, so a cache that stays at capacity stops
//! allocating once it has filled up. Links between nodes are plain indices,
//! which keeps every cache structure free of raw pointers.

extern crate alloc;

use alloc::vec::Vec;

/// Stable handle to an occupied slot.
///
/// A handle stays valid until its slot is removed. After that the index may
/// be reused by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SlotId(usize);

#[derive(Debug)]
pub(crate) struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> SlotId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(value);
            idx
        } else {
            self.slots.push(Some(value));
            self.slots.len() - 1
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Frees the slot. Returns `None` for a slot that is already free, so
    /// `len` only drops for occupied slots.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        debug_assert!(self.len > 0, "occupied slot with zero len");
        self.len -= 1;
        Some(value)
    }

    #[inline]
    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Drops every value but keeps the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_reuse() {
        let mut arena = SlotArena::with_capacity(2);
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 1);

        let c = arena.insert("c");
        assert_eq!(c, a);
        assert_eq!(arena.get(c), Some(&"c"));
        assert_eq!(arena.get(b), Some(&"b"));
    }

    #[test]
    fn test_get_mut_and_clear() {
        let mut arena = SlotArena::with_capacity(1);
        let id = arena.insert(1);
        *arena.get_mut(id).unwrap() += 41;
        assert_eq!(arena.get(id), Some(&42));

        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.get(id), None);
    }
}
