//! Doubly linked recency list over a slot arena.
//!
//! The list only stores its two ends and its length. The nodes themselves
//! live in a [`SlotArena`] owned by the cache, which lets several lists share
//! one arena (the LFRU buckets do this) and lets a node move between lists
//! without being reallocated.
//!
//! Orientation: the front is the most recently used end, the back is the
//! least recently used end and therefore the eviction candidate.

use crate::arena::{SlotArena, SlotId};

/// A node in the doubly linked list.
///
/// Holds a value plus the ids of its neighbours. Not meant to be used
/// directly by users of the caches.
#[derive(Debug)]
pub(crate) struct Entry<T> {
    val: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl<T> Entry<T> {
    pub(crate) fn new(val: T) -> Self {
        Entry {
            val,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) fn get_value(&self) -> &T {
        &self.val
    }

    #[inline]
    pub(crate) fn get_value_mut(&mut self) -> &mut T {
        &mut self.val
    }

    #[inline]
    pub(crate) fn into_value(self) -> T {
        self.val
    }
}

/// Arena of list nodes.
pub(crate) type Nodes<T> = SlotArena<Entry<T>>;

/// Ends of a doubly linked list whose nodes live in a [`Nodes`] arena.
///
/// Every method takes the arena explicitly. A node id must only be passed to
/// the list it is currently attached to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct List {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl List {
    pub(crate) const fn new() -> Self {
        List {
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently used node.
    #[inline]
    pub(crate) fn front(&self) -> Option<SlotId> {
        self.head
    }

    /// Least recently used node.
    #[inline]
    pub(crate) fn back(&self) -> Option<SlotId> {
        self.tail
    }

    /// Stores `val` in the arena and links it at the front.
    pub(crate) fn add<T>(&mut self, nodes: &mut Nodes<T>, val: T) -> SlotId {
        let id = nodes.insert(Entry::new(val));
        self.attach(nodes, id);
        id
    }

    /// Links a detached node at the front.
    pub(crate) fn attach<T>(&mut self, nodes: &mut Nodes<T>, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = nodes.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return;
        }
        match old_head.and_then(|h| nodes.get_mut(h)) {
            Some(head) => head.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
    }

    /// Unlinks a node from this list without freeing its slot.
    ///
    /// `id` must be linked into this list. Detaching a node of another list
    /// would rewrite this list's head and tail.
    pub(crate) fn detach<T>(&mut self, nodes: &mut Nodes<T>, id: SlotId) {
        debug_assert!(self.len > 0, "detach from an empty list");
        let (prev, next) = match nodes.get_mut(id) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };
        match prev.and_then(|p| nodes.get_mut(p)) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| nodes.get_mut(n)) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }
        self.len = self.len.saturating_sub(1);
    }

    /// Marks a node as most recently used.
    pub(crate) fn move_to_front<T>(&mut self, nodes: &mut Nodes<T>, id: SlotId) {
        if self.head == Some(id) {
            return;
        }
        self.detach(nodes, id);
        self.attach(nodes, id);
    }

    /// Unlinks a node and frees its slot.
    pub(crate) fn remove<T>(&mut self, nodes: &mut Nodes<T>, id: SlotId) -> Option<T> {
        self.detach(nodes, id);
        nodes.remove(id).map(Entry::into_value)
    }

    /// Removes the least recently used node.
    pub(crate) fn remove_last<T>(&mut self, nodes: &mut Nodes<T>) -> Option<T> {
        let id = self.tail?;
        self.remove(nodes, id)
    }

    /// Forgets all links. The caller clears the arena.
    pub(crate) fn clear(&mut self) {
        *self = List::new();
    }

    /// Walks from the least recently used node to the most recently used one.
    pub(crate) fn iter_lru<'a, T>(&self, nodes: &'a Nodes<T>) -> Iter<'a, T> {
        Iter {
            nodes,
            cursor: self.tail,
            remaining: self.len,
        }
    }
}

/// Iterator from the back of a [`List`] towards its front.
pub(crate) struct Iter<'a, T> {
    nodes: &'a Nodes<T>,
    cursor: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.nodes.get(self.cursor?)?;
        self.cursor = node.prev;
        self.remaining -= 1;
        Some(&node.val)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    fn collect<T: Copy>(list: &List, nodes: &Nodes<T>) -> Vec<T> {
        list.iter_lru(nodes).copied().collect()
    }

    #[test]
    fn test_add_items() {
        let mut nodes = Nodes::with_capacity(4);
        let mut list = List::new();
        assert!(list.is_empty());

        list.add(&mut nodes, 1);
        list.add(&mut nodes, 2);
        list.add(&mut nodes, 3);

        assert_eq!(list.len(), 3);
        assert_eq!(collect(&list, &nodes), [1, 2, 3]);
    }

    #[test]
    fn test_move_to_front() {
        let mut nodes = Nodes::with_capacity(4);
        let mut list = List::new();
        let a = list.add(&mut nodes, 'a');
        let b = list.add(&mut nodes, 'b');
        let c = list.add(&mut nodes, 'c');

        list.move_to_front(&mut nodes, a);
        assert_eq!(collect(&list, &nodes), ['b', 'c', 'a']);
        assert_eq!(list.front(), Some(a));
        assert_eq!(list.back(), Some(b));

        list.move_to_front(&mut nodes, a);
        assert_eq!(collect(&list, &nodes), ['b', 'c', 'a']);

        list.move_to_front(&mut nodes, c);
        assert_eq!(collect(&list, &nodes), ['b', 'a', 'c']);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_remove_first_middle_last() {
        let mut nodes = Nodes::with_capacity(4);
        let mut list = List::new();
        let a = list.add(&mut nodes, 1);
        let b = list.add(&mut nodes, 2);
        let c = list.add(&mut nodes, 3);

        assert_eq!(list.remove(&mut nodes, b), Some(2));
        assert_eq!(collect(&list, &nodes), [1, 3]);

        assert_eq!(list.remove_last(&mut nodes), Some(1));
        assert_eq!(list.back(), Some(c));

        assert_eq!(list.remove(&mut nodes, c), Some(3));
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.remove_last(&mut nodes), None);
        assert_eq!(nodes.get(a).map(Entry::get_value), None);
    }

    #[test]
    fn test_cross_list_node_transfer() {
        let mut nodes = Nodes::with_capacity(4);
        let mut low = List::new();
        let mut high = List::new();
        let a = low.add(&mut nodes, 'a');
        low.add(&mut nodes, 'b');

        low.detach(&mut nodes, a);
        high.attach(&mut nodes, a);

        assert_eq!(low.len(), 1);
        assert_eq!(high.len(), 1);
        assert_eq!(collect(&low, &nodes), ['b']);
        assert_eq!(collect(&high, &nodes), ['a']);
    }

    #[test]
    fn test_length_consistency_after_complex_operations() {
        let mut nodes = Nodes::with_capacity(16);
        let mut list = List::new();
        let ids: Vec<_> = (0..10).map(|i| list.add(&mut nodes, i)).collect();

        for id in ids.iter().step_by(3) {
            list.move_to_front(&mut nodes, *id);
        }
        for id in ids.iter().skip(1).step_by(4) {
            list.remove(&mut nodes, *id);
        }

        let walked = collect(&list, &nodes);
        assert_eq!(walked.len(), list.len());
        assert_eq!(list.len(), nodes.len());
        assert_eq!(walked, [2, 4, 7, 8, 0, 3, 6]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "detach from an empty list")]
    fn test_detach_from_wrong_list_is_caught() {
        let mut nodes = Nodes::with_capacity(2);
        let mut owner = List::new();
        let id = owner.add(&mut nodes, 1);
        let mut other = List::new();
        other.detach(&mut nodes, id);
    }

    #[test]
    fn test_lists_in_parallel_threads() {
        let mut pool = scoped_threadpool::Pool::new(4);
        pool.scoped(|scope| {
            for t in 0..4 {
                scope.execute(move || {
                    let mut nodes = Nodes::with_capacity(8);
                    let mut list = List::new();
                    for i in 0..100 {
                        let id = list.add(&mut nodes, t * 1000 + i);
                        if i % 2 == 0 {
                            list.remove(&mut nodes, id);
                        }
                    }
                    assert_eq!(list.len(), 50);
                });
            }
        });
    }
}
