//! Ordered frequency ranking for the LFU cache.
//!
//! Every live entry appears exactly once, keyed by its `(frequency, sequence)`
//! rank. The first key of the map is the eviction candidate, so finding it is
//! O(log n) and re-ranking after an access is one removal plus one insertion.

extern crate alloc;

use crate::arena::SlotId;
use alloc::collections::BTreeMap;

/// `(frequency, insertion sequence)`; smaller ranks are evicted first.
pub(crate) type Rank = (u64, u64);

#[derive(Debug, Default)]
pub(crate) struct FrequencyRanking {
    ranks: BTreeMap<Rank, SlotId>,
}

impl FrequencyRanking {
    pub(crate) const fn new() -> Self {
        Self {
            ranks: BTreeMap::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.ranks.len()
    }

    pub(crate) fn insert(&mut self, rank: Rank, id: SlotId) {
        self.ranks.insert(rank, id);
    }

    pub(crate) fn remove(&mut self, rank: Rank) -> Option<SlotId> {
        self.ranks.remove(&rank)
    }

    /// Moves an entry from its old rank to its new one.
    pub(crate) fn rerank(&mut self, old: Rank, new: Rank) {
        if old == new {
            return;
        }
        if let Some(id) = self.ranks.remove(&old) {
            self.ranks.insert(new, id);
        }
    }

    /// Lowest ranked entry.
    #[inline]
    pub(crate) fn first(&self) -> Option<SlotId> {
        self.ranks.first_key_value().map(|(_, id)| *id)
    }

    pub(crate) fn pop_first(&mut self) -> Option<SlotId> {
        self.ranks.pop_first().map(|(_, id)| id)
    }

    /// Entries from the lowest rank to the highest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.ranks.values().copied()
    }

    pub(crate) fn clear(&mut self) {
        self.ranks.clear();
    }
}
