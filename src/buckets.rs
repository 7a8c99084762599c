//! Frequency buckets for the LFRU cache.
//!
//! Entries are grouped by exact access count. Each bucket is a recency
//! [`List`] over the cache's shared node arena, so an entry moving to the next
//! count is relinked, never reallocated.
//!
//! Only non-empty buckets are kept in the map. The lowest count is therefore
//! always the first key, and the eviction candidate is the least recently
//! used entry of that bucket.

extern crate alloc;

use crate::arena::SlotId;
use crate::list::{List, Nodes};
use alloc::collections::BTreeMap;

#[derive(Debug, Default)]
pub(crate) struct FrequencyBuckets {
    buckets: BTreeMap<u64, List>,
}

impl FrequencyBuckets {
    pub(crate) const fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Number of non-empty buckets.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Stores `val` at the most recently used end of bucket `frequency`.
    pub(crate) fn add<T>(&mut self, nodes: &mut Nodes<T>, frequency: u64, val: T) -> SlotId {
        self.buckets
            .entry(frequency)
            .or_insert_with(List::new)
            .add(nodes, val)
    }

    /// Moves an entry from bucket `from` to the most recently used end of
    /// bucket `to`, dropping `from` if it empties.
    pub(crate) fn promote<T>(&mut self, nodes: &mut Nodes<T>, id: SlotId, from: u64, to: u64) {
        if from == to {
            if let Some(list) = self.buckets.get_mut(&from) {
                list.move_to_front(nodes, id);
            }
            return;
        }
        self.detach(nodes, id, from);
        self.buckets
            .entry(to)
            .or_insert_with(List::new)
            .attach(nodes, id);
    }

    /// Unlinks and frees an entry that lives in bucket `frequency`.
    pub(crate) fn remove<T>(&mut self, nodes: &mut Nodes<T>, id: SlotId, frequency: u64) -> Option<T> {
        self.detach(nodes, id, frequency);
        nodes.remove(id).map(|node| node.into_value())
    }

    /// Least recently used entry of the lowest bucket.
    pub(crate) fn candidate(&self) -> Option<SlotId> {
        self.buckets.first_key_value()?.1.back()
    }

    /// Removes the eviction candidate.
    pub(crate) fn pop_lowest<T>(&mut self, nodes: &mut Nodes<T>) -> Option<T> {
        let mut lowest = self.buckets.first_entry()?;
        let val = lowest.get_mut().remove_last(nodes);
        if lowest.get().is_empty() {
            lowest.remove();
        }
        val
    }

    /// Walks buckets from the lowest count up, each from least to most
    /// recently used.
    pub(crate) fn iter<'a, T>(&'a self, nodes: &'a Nodes<T>) -> impl Iterator<Item = &'a T> + 'a {
        self.buckets.values().flat_map(move |list| list.iter_lru(nodes))
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }

    fn detach<T>(&mut self, nodes: &mut Nodes<T>, id: SlotId, frequency: u64) {
        if let Some(list) = self.buckets.get_mut(&frequency) {
            list.detach(nodes, id);
            if list.is_empty() {
                self.buckets.remove(&frequency);
            }
        }
    }
}
