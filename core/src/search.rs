//! Record lookup: case-insensitive substring scan and binary
//! exact-match over a presorted store.
//!
//! All case folding goes through `normalize`.

use crate::{
    record::{Field, Record},
    sort::{self, Algorithm, Order, SortReport, SortSpec},
    store::{IndexedStore, RecordStore},
    types::Position,
};

/// Case folding used by every comparison in this module and by
/// folded sort keys.
pub fn normalize(value: &str) -> String {
    value.to_lowercase()
}

/// Offset/limit slice of a match sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub offset: usize,
    /// `None` means no upper bound.
    pub limit:  Option<usize>,
}

impl Window {
    pub const ALL: Window = Window { offset: 0, limit: None };

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit: Some(limit) }
    }

    /// Window covering page `page` of `size` matches.
    pub fn page(page: usize, size: usize) -> Self {
        Self::new(page.saturating_mul(size), size)
    }

    fn end(&self) -> Option<usize> {
        self.limit.map(|limit| self.offset.saturating_add(limit))
    }
}

/// A case-insensitive substring query against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub field: Field,
    needle:    String,
}

impl Query {
    pub fn new(field: Field, term: &str) -> Self {
        Self { field, needle: normalize(term) }
    }

    /// The folded search term.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// An empty term matches everything.
    pub fn matches(&self, record: &Record) -> bool {
        self.needle.is_empty() || normalize(self.field.value(record)).contains(&self.needle)
    }
}

/// One match: which of the searched stores it came from, where in
/// that store, and the record itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    pub store:    usize,
    pub position: Position,
    pub record:   &'a Record,
}

/// Scan `stores` in order, returning the matches that fall inside
/// `window` in scan order.
pub fn linear_search<'a>(
    stores: &[&'a dyn RecordStore],
    query: &Query,
    window: Window,
) -> Vec<Hit<'a>> {
    let mut hits = Vec::new();
    let mut seen = 0usize;
    let end = window.end();

    for (store_idx, store) in stores.iter().enumerate() {
        if store.is_empty() {
            continue;
        }
        for (position, record) in store.iter().enumerate() {
            if end.is_some_and(|end| seen >= end) {
                return hits;
            }
            if !query.matches(record) {
                continue;
            }
            if seen >= window.offset {
                hits.push(Hit { store: store_idx, position, record });
            }
            seen += 1;
        }
    }
    log::debug!(
        "linear search {}~'{}': {} hits (offset {})",
        query.field.name(),
        query.needle,
        hits.len(),
        window.offset
    );
    hits
}

/// Total number of matches across `stores`.
pub fn count_matches(stores: &[&dyn RecordStore], query: &Query) -> usize {
    stores
        .iter()
        .map(|store| store.iter().filter(|record| query.matches(record)).count())
        .sum()
}

/// Leftmost position whose folded `field` equals the folded `target`.
///
/// The store must already be sorted ascending by the folded field
/// (`SortSpec::folded`, or `sorted_copy`); otherwise the answer is
/// meaningless (typically a false `None`). On a sequential store
/// every probe walks from the front.
pub fn binary_search(store: &dyn RecordStore, field: Field, target: &str) -> Option<Position> {
    let needle = normalize(target);
    let len = store.len();
    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if normalize(field.value(store.get(mid))) < needle {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    (lo < len && normalize(field.value(store.get(lo))) == needle).then_some(lo)
}

/// An indexed copy of `store`, bucket sorted ascending by the folded
/// `field`: the order `binary_search` requires. `store` is untouched.
pub fn sorted_copy(store: &dyn RecordStore, field: Field) -> (IndexedStore, SortReport) {
    let mut copy = IndexedStore::from_records(store.iter().cloned());
    let spec = SortSpec::new(Algorithm::Bucket, Order::Ascending).by(field).folded();
    let report = sort::sort(&mut copy, &spec);
    (copy, report)
}

/// Binary existence check per store, then a substring scan of the
/// stores that reported a hit to enumerate every match.
pub fn binary_then_scan<'a>(
    stores: &[&'a dyn RecordStore],
    field: Field,
    target: &str,
    window: Window,
) -> Vec<Hit<'a>> {
    let hit_stores: Vec<usize> = stores
        .iter()
        .enumerate()
        .filter(|(_, store)| binary_search(**store, field, target).is_some())
        .map(|(i, _)| i)
        .collect();
    if hit_stores.is_empty() {
        log::debug!("binary search {}=='{target}': not found", field.name());
        return Vec::new();
    }

    let subset: Vec<&'a dyn RecordStore> = hit_stores.iter().map(|&i| stores[i]).collect();
    let query = Query::new(field, target);
    linear_search(&subset, &query, window)
        .into_iter()
        .map(|hit| Hit { store: hit_stores[hit.store], ..hit })
        .collect()
}
