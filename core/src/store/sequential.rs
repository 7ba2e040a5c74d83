//! Singly-linked sequential store.
//!
//! Nodes live in an arena (`slots` + `links`) and point at their
//! successor by index, so relinking never creates live aliases.
//! A node's `NodeId` is stable until `clear()`.

use super::{Backend, CapacityGuard, RecordStore, StoreAccess};
use crate::{
    record::Record,
    types::{NodeId, Position},
};

#[derive(Debug, Clone, Default)]
pub struct SequentialStore {
    slots:    Vec<Record>,
    links:    Vec<Option<NodeId>>,
    head:     Option<NodeId>,
    tail:     Option<NodeId>,
    len:      usize,
    capacity: CapacityGuard,
}

impl SequentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            capacity: CapacityGuard::new(limit),
            ..Self::default()
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.add(record);
        }
        store
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// Successor of `node`. Panics on a foreign id.
    pub fn next_of(&self, node: NodeId) -> Option<NodeId> {
        self.links[node]
    }

    /// Payload of `node`. Panics on a foreign id.
    pub fn record(&self, node: NodeId) -> &Record {
        &self.slots[node]
    }

    pub(crate) fn set_next(&mut self, node: NodeId, next: Option<NodeId>) {
        self.links[node] = next;
    }

    /// Exchange the payloads of two nodes, leaving the links untouched.
    pub fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        self.slots.swap(a, b);
    }

    /// Last node of the chain starting at `start`.
    pub(crate) fn last_of(&self, start: NodeId) -> NodeId {
        let mut node = start;
        while let Some(next) = self.links[node] {
            node = next;
        }
        node
    }

    /// Replace the whole chain with the one starting at `head`.
    /// Length and tail are recomputed by walking the new chain; nodes
    /// left unreachable stay allocated until `clear()`.
    pub fn adopt_sequence(&mut self, head: Option<NodeId>) {
        self.head = head;
        self.tail = None;
        self.len = 0;
        let mut cursor = head;
        while let Some(node) = cursor {
            self.len += 1;
            self.tail = Some(node);
            cursor = self.links[node];
        }
    }

    /// Node ids in chain order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.head, move |&node| self.links[node])
    }

    pub fn chain(&self) -> ChainIter<'_> {
        ChainIter {
            store:  self,
            cursor: self.head,
        }
    }
}

/// Front-to-back walk over a sequential store.
pub struct ChainIter<'a> {
    store:  &'a SequentialStore,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = self.store.links[node];
        Some(&self.store.slots[node])
    }
}

impl RecordStore for SequentialStore {
    fn backend(&self) -> Backend {
        Backend::Sequential
    }

    fn add(&mut self, record: Record) -> bool {
        if !self.capacity.admit(self.len, Backend::Sequential, &record) {
            return false;
        }
        let node = self.slots.len();
        self.slots.push(record);
        self.links.push(None);
        match self.tail {
            Some(tail) => self.links[tail] = Some(node),
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        true
    }

    fn len(&self) -> usize {
        self.len
    }

    fn try_get(&self, index: Position) -> Option<&Record> {
        if index >= self.len {
            return None;
        }
        self.chain().nth(index)
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.links.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.capacity.reset();
    }

    fn dropped(&self) -> usize {
        self.capacity.dropped
    }

    fn capacity_limit(&self) -> Option<usize> {
        self.capacity.limit
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        Box::new(self.chain())
    }

    fn take_all(&mut self) -> Vec<Record> {
        let order: Vec<NodeId> = self.nodes().collect();
        let mut slots: Vec<Option<Record>> =
            std::mem::take(&mut self.slots).into_iter().map(Some).collect();
        let records = order
            .into_iter()
            .filter_map(|node| slots[node].take())
            .collect();
        let dropped = self.capacity.dropped;
        self.clear();
        self.capacity.dropped = dropped;
        records
    }

    fn access_mut(&mut self) -> StoreAccess<'_> {
        StoreAccess::Sequential(self)
    }
}
