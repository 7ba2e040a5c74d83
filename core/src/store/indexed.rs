use super::{Backend, CapacityGuard, RandomAccess, RecordStore, StoreAccess};
use crate::{record::Record, types::Position};

/// Contiguous store. O(1) `get` and `swap`.
#[derive(Debug, Clone, Default)]
pub struct IndexedStore {
    records:  Vec<Record>,
    capacity: CapacityGuard,
}

impl IndexedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            records:  Vec::new(),
            capacity: CapacityGuard::new(limit),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.add(record);
        }
        store
    }

    /// Mutable slice for in-place positional algorithms.
    pub(crate) fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }
}

impl RecordStore for IndexedStore {
    fn backend(&self) -> Backend {
        Backend::Indexed
    }

    fn add(&mut self, record: Record) -> bool {
        if !self.capacity.admit(self.records.len(), Backend::Indexed, &record) {
            return false;
        }
        self.records.push(record);
        true
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn try_get(&self, index: Position) -> Option<&Record> {
        self.records.get(index)
    }

    fn clear(&mut self) {
        self.records.clear();
        self.capacity.reset();
    }

    fn dropped(&self) -> usize {
        self.capacity.dropped
    }

    fn capacity_limit(&self) -> Option<usize> {
        self.capacity.limit
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        Box::new(self.records.iter())
    }

    fn take_all(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    fn access_mut(&mut self) -> StoreAccess<'_> {
        StoreAccess::Indexed(self)
    }
}

impl RandomAccess for IndexedStore {
    fn swap(&mut self, i: Position, j: Position) {
        self.records.swap(i, j);
    }

    fn as_slice(&self) -> &[Record] {
        &self.records
    }
}
