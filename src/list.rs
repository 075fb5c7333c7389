use slotmap::{new_key_type, SlotMap};

use crate::entry::Entry;

new_key_type! {
    /// Stable handle to a node in the recency list.
    pub(crate) struct NodeRef;
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) entry: Entry<V>,
    prev: Option<NodeRef>,
    next: Option<NodeRef>,
}

/// Doubly linked list of cache slots ordered by last touch.
///
/// The front is the least-recently-touched entry (the eviction victim), the
/// back is the most-recently-touched one. Nodes live in a slotmap so handles
/// stay valid across unrelated insertions and removals, giving O(1)
/// move-to-back and O(1) front eviction.
pub(crate) struct RecencyList<K, V> {
    nodes: SlotMap<NodeRef, Node<K, V>>,
    head: Option<NodeRef>,
    tail: Option<NodeRef>,
}

impl<K, V> RecencyList<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn get(&self, r: NodeRef) -> &Node<K, V> {
        &self.nodes[r]
    }

    pub(crate) fn get_mut(&mut self, r: NodeRef) -> &mut Node<K, V> {
        &mut self.nodes[r]
    }

    /// Handle of the least-recently-touched node, if any.
    pub(crate) fn front(&self) -> Option<NodeRef> {
        self.head
    }

    /// Successor of `r` walking from least to most recently touched.
    pub(crate) fn next_of(&self, r: NodeRef) -> Option<NodeRef> {
        self.nodes[r].next
    }

    /// Appends a node at the most-recently-touched position.
    pub(crate) fn push_back(&mut self, key: K, entry: Entry<V>) -> NodeRef {
        let tail = self.tail;
        let r = self.nodes.insert(Node {
            key,
            entry,
            prev: tail,
            next: None,
        });

        match tail {
            Some(t) => self.nodes[t].next = Some(r),
            None => self.head = Some(r),
        }
        self.tail = Some(r);

        r
    }

    fn unlink(&mut self, r: NodeRef) {
        let (prev, next) = {
            let node = &self.nodes[r];
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
    }

    pub(crate) fn remove(&mut self, r: NodeRef) -> Node<K, V> {
        self.unlink(r);

        // the handle came from this list, so the slot is always occupied.
        self.nodes.remove(r).unwrap()
    }

    pub(crate) fn pop_front(&mut self) -> Option<Node<K, V>> {
        let r = self.head?;
        Some(self.remove(r))
    }

    /// Re-links `r` at the most-recently-touched position.
    pub(crate) fn move_to_back(&mut self, r: NodeRef) {
        if self.tail == Some(r) {
            return;
        }

        self.unlink(r);

        let tail = self.tail;
        {
            let node = &mut self.nodes[r];
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(t) => self.nodes[t].next = Some(r),
            None => self.head = Some(r),
        }
        self.tail = Some(r);
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }
}
