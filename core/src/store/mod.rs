//! Record storage.
//!
//! RULE: Sorter, Searcher and Paginator are written once against
//! `RecordStore`. Only the sorter looks through `access_mut()` at the
//! concrete representation, and only to pick the swap-based or the
//! relink-based variant of an algorithm.
//!
//! Two representations share the contract:
//!   - `IndexedStore`:    contiguous, O(1) `get`, positional `swap`.
//!   - `SequentialStore`: singly-linked chain over an arena, O(n) `get`,
//!                        whole-chain replacement via `adopt_sequence`.

mod indexed;
mod sequential;

pub use indexed::IndexedStore;
pub use sequential::{ChainIter, SequentialStore};

use crate::{record::Record, types::Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which representation backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Indexed,
    Sequential,
}

impl Backend {
    pub const ALL: [Backend; 2] = [Backend::Indexed, Backend::Sequential];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Indexed    => "indexed",
            Self::Sequential => "sequential",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed view of a store's concrete representation.
pub enum StoreAccess<'a> {
    Indexed(&'a mut IndexedStore),
    Sequential(&'a mut SequentialStore),
}

/// The contract every store fulfils: an ordered, owning sequence.
pub trait RecordStore {
    fn backend(&self) -> Backend;

    /// Append at the end. Returns `false` when a capacity bound
    /// rejected the record; the drop is counted, not raised.
    fn add(&mut self, record: Record) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn try_get(&self, index: Position) -> Option<&Record>;

    /// Record at `index` in current order.
    /// Panics when `index >= len()`.
    fn get(&self, index: Position) -> &Record {
        match self.try_get(index) {
            Some(record) => record,
            None => panic!(
                "index {index} out of range for {} store of {} records",
                self.backend(),
                self.len()
            ),
        }
    }

    /// Drop every record and reset the drop counter.
    fn clear(&mut self);

    /// Records rejected by the capacity bound since the last `clear`.
    fn dropped(&self) -> usize;

    fn capacity_limit(&self) -> Option<usize>;

    fn iter(&self) -> Box<dyn Iterator<Item = &Record> + '_>;

    /// Move every record out in current order, leaving the store empty.
    fn take_all(&mut self) -> Vec<Record>;

    fn access_mut(&mut self) -> StoreAccess<'_>;
}

/// Capability of stores with O(1) positional access.
pub trait RandomAccess: RecordStore {
    /// Exchange the records at positions `i` and `j`.
    /// Panics when either position is out of range.
    fn swap(&mut self, i: Position, j: Position);

    fn as_slice(&self) -> &[Record];
}

/// Shared bookkeeping for the optional capacity bound.
#[derive(Debug, Clone, Default)]
struct CapacityGuard {
    limit:   Option<usize>,
    dropped: usize,
}

impl CapacityGuard {
    fn new(limit: Option<usize>) -> Self {
        Self { limit, dropped: 0 }
    }

    /// Whether one more record fits next to `len` existing ones.
    fn admit(&mut self, len: usize, backend: Backend, record: &Record) -> bool {
        match self.limit {
            Some(limit) if len >= limit => {
                if self.dropped == 0 {
                    log::warn!(
                        "{backend} store full at {limit} records; dropping '{}' and any further adds",
                        record.transaction_id
                    );
                }
                self.dropped += 1;
                false
            }
            _ => true,
        }
    }

    fn reset(&mut self) {
        self.dropped = 0;
    }
}

/// Build an empty store of the requested representation.
pub fn new_store(backend: Backend, limit: Option<usize>) -> Box<dyn RecordStore> {
    match backend {
        Backend::Indexed    => Box::new(IndexedStore::with_limit(limit)),
        Backend::Sequential => Box::new(SequentialStore::with_limit(limit)),
    }
}
