//! In-place sorting of record stores by one text field.
//!
//! Keys compare by plain byte order with no secondary tie-break, or
//! by their lower-cased form under `SortSpec::folded` (the order
//! `search::binary_search` expects).
//! Every algorithm leaves the store holding a permutation of what it
//! held before.
//!
//!   - Bucket:    stable; shared by both backends via `take_all`/`add`.
//!   - QuickSort: indexed partitions by positional swap (last-element
//!                pivot); sequential relinks nodes (first-node pivot).
//!   - Bubble:    indexed swaps positions; sequential swaps payloads
//!                of adjacent nodes.

use crate::{
    metrics::Stopwatch,
    record::{Field, Record},
    search::normalize,
    store::{Backend, RandomAccess, RecordStore, SequentialStore, StoreAccess},
    types::NodeId,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// The eight cities the legacy fixed-label bucket sort knew about.
pub const LEGACY_CITY_LABELS: [&str; 8] = [
    "Berlin", "Dubai", "London", "New York", "Singapore", "Sydney", "Tokyo", "Toronto",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Bucket,
    QuickSort,
    Bubble,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bucket, Algorithm::QuickSort, Algorithm::Bubble];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bucket    => "bucket",
            Self::QuickSort => "quicksort",
            Self::Bubble    => "bubble",
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Bucket)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    /// `a` must come strictly before `b`.
    pub fn precedes(&self, a: &str, b: &str) -> bool {
        match self {
            Self::Ascending  => a < b,
            Self::Descending => a > b,
        }
    }

    /// `a` may sit before `b` in a sorted result.
    pub fn admits(&self, a: &str, b: &str) -> bool {
        !self.precedes(b, a)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ascending  => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// Where bucket sort gets its labels from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelSet {
    /// Every distinct key present in the store.
    #[default]
    Discovered,
    /// A caller-supplied list. Records whose key is not listed are kept
    /// in a trailing group in their original relative order.
    Fixed(Vec<String>),
}

impl LabelSet {
    pub fn legacy_cities() -> Self {
        Self::Fixed(LEGACY_CITY_LABELS.iter().map(|c| c.to_string()).collect())
    }
}

/// The text a record is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortKey {
    pub field:  Field,
    /// Compare lower-cased values.
    pub folded: bool,
}

impl SortKey {
    pub fn of<'r>(&self, record: &'r Record) -> Cow<'r, str> {
        let value = self.field.value(record);
        if self.folded {
            Cow::Owned(normalize(value))
        } else {
            Cow::Borrowed(value)
        }
    }
}

impl From<Field> for SortKey {
    fn from(field: Field) -> Self {
        Self { field, folded: false }
    }
}

/// What to sort by and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub algorithm: Algorithm,
    pub field:     Field,
    pub order:     Order,
    pub labels:    LabelSet,
    pub folded:    bool,
}

impl SortSpec {
    /// Sort by location with discovered labels.
    pub fn new(algorithm: Algorithm, order: Order) -> Self {
        Self {
            algorithm,
            field: Field::Location,
            order,
            labels: LabelSet::Discovered,
            folded: false,
        }
    }

    pub fn by(mut self, field: Field) -> Self {
        self.field = field;
        self
    }

    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = labels;
        self
    }

    /// Order by lower-cased keys.
    pub fn folded(mut self) -> Self {
        self.folded = true;
        self
    }

    pub fn key(&self) -> SortKey {
        SortKey { field: self.field, folded: self.folded }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortReport {
    pub algorithm: Algorithm,
    pub backend:   Backend,
    pub field:     Field,
    pub order:     Order,
    pub records:   usize,
    /// Records that matched no fixed label (always 0 for discovered labels).
    pub unmatched: usize,
    pub elapsed:   Duration,
}

/// Sort `store` in place according to `spec`.
pub fn sort(store: &mut dyn RecordStore, spec: &SortSpec) -> SortReport {
    let watch = Stopwatch::start();
    let backend = store.backend();
    let records = store.len();
    let key = spec.key();

    let unmatched = match spec.algorithm {
        Algorithm::Bucket => bucket_sort(store, key, spec.order, &spec.labels),
        Algorithm::QuickSort => {
            match store.access_mut() {
                StoreAccess::Indexed(s)    => quick_sort_indexed(s, key, spec.order),
                StoreAccess::Sequential(s) => quick_sort_sequential(s, key, spec.order),
            }
            0
        }
        Algorithm::Bubble => {
            match store.access_mut() {
                StoreAccess::Indexed(s)    => bubble_sort_indexed(s, key, spec.order),
                StoreAccess::Sequential(s) => bubble_sort_sequential(s, key, spec.order),
            }
            0
        }
    };

    let report = SortReport {
        algorithm: spec.algorithm,
        backend,
        field: spec.field,
        order: spec.order,
        records,
        unmatched,
        elapsed: watch.elapsed(),
    };
    log::info!(
        "{} sort ({}) of {} {} records by {}{}: {:?}",
        report.algorithm.name(),
        report.order.name(),
        report.records,
        report.backend,
        report.field.name(),
        if spec.folded { " (folded)" } else { "" },
        report.elapsed
    );
    report
}

// ── Bucket sort ──────────────────────────────────────────────────────────────

/// Stable bucket sort. Returns how many records matched no label.
pub fn bucket_sort(
    store: &mut dyn RecordStore,
    key: impl Into<SortKey>,
    order: Order,
    labels: &LabelSet,
) -> usize {
    let key = key.into();
    let records = store.take_all();

    let mut labels = match labels {
        LabelSet::Discovered => discover_labels(&records, key),
        LabelSet::Fixed(fixed) => {
            let mut unique: Vec<String> = Vec::with_capacity(fixed.len());
            for label in fixed {
                let label = if key.folded { normalize(label) } else { label.clone() };
                if !unique.contains(&label) {
                    unique.push(label);
                }
            }
            unique
        }
    };
    selection_sort_labels(&mut labels, order);

    let slot: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let mut buckets: Vec<Vec<Record>> = vec![Vec::new(); labels.len()];
    let mut unmatched: Vec<Record> = Vec::new();
    for record in records {
        let bucket = slot.get(&*key.of(&record)).copied();
        match bucket {
            Some(i) => buckets[i].push(record),
            None => unmatched.push(record),
        }
    }

    let unmatched_count = unmatched.len();
    if unmatched_count > 0 {
        log::warn!(
            "bucket sort: {unmatched_count} records have a {} outside the label set; kept at the end",
            key.field.name()
        );
    }
    log::debug!("bucket sort: {} labels", labels.len());

    for record in buckets.into_iter().flatten().chain(unmatched) {
        store.add(record);
    }
    unmatched_count
}

/// Distinct keys, in first-seen order.
pub fn discover_labels(records: &[Record], key: impl Into<SortKey>) -> Vec<String> {
    let key = key.into();
    let mut seen: HashSet<Cow<'_, str>> = HashSet::new();
    let mut labels = Vec::new();
    for record in records {
        let value = key.of(record);
        if !seen.contains(&value) {
            labels.push(value.to_string());
            seen.insert(value);
        }
    }
    labels
}

fn selection_sort_labels(labels: &mut [String], order: Order) {
    for i in 0..labels.len() {
        let mut best = i;
        for j in (i + 1)..labels.len() {
            if order.precedes(&labels[j], &labels[best]) {
                best = j;
            }
        }
        labels.swap(i, best);
    }
}

// ── Quicksort ────────────────────────────────────────────────────────────────

/// Partition-exchange sort with the last element as pivot.
/// Recurses into the smaller side and loops on the larger one.
pub fn quick_sort_indexed<S: RandomAccess + ?Sized>(
    store: &mut S,
    key: impl Into<SortKey>,
    order: Order,
) {
    let len = store.len();
    quick_sort_range(store, 0, len, key.into(), order);
}

fn quick_sort_range<S: RandomAccess + ?Sized>(
    store: &mut S,
    mut lo: usize,
    mut hi: usize,
    key: SortKey,
    order: Order,
) {
    while hi - lo > 1 {
        let p = partition(store, lo, hi, key, order);
        if p - lo < hi - p - 1 {
            quick_sort_range(store, lo, p, key, order);
            lo = p + 1;
        } else {
            quick_sort_range(store, p + 1, hi, key, order);
            hi = p;
        }
    }
}

/// Lomuto partition of `[lo, hi)`. Returns the pivot's final position.
fn partition<S: RandomAccess + ?Sized>(
    store: &mut S,
    lo: usize,
    hi: usize,
    key: SortKey,
    order: Order,
) -> usize {
    let pivot = hi - 1;
    let pivot_key = key.of(store.get(pivot)).into_owned();
    let mut boundary = lo;
    for j in lo..pivot {
        let keep_left = order.admits(&key.of(store.get(j)), &pivot_key);
        if keep_left {
            store.swap(boundary, j);
            boundary += 1;
        }
    }
    store.swap(boundary, pivot);
    boundary
}

/// A linked run of nodes, both ends known.
#[derive(Debug, Clone, Copy)]
struct Segment {
    head: NodeId,
    tail: NodeId,
}

/// Append `next` after `acc`.
fn splice(store: &mut SequentialStore, acc: Option<Segment>, next: Segment) -> Segment {
    match acc {
        Some(acc) => {
            store.set_next(acc.tail, Some(next.head));
            Segment { head: acc.head, tail: next.tail }
        }
        None => next,
    }
}

/// Quicksort over the link structure. The first node is the pivot;
/// the rest are relinked by prepending into a before-chain, a tie
/// chain (kept right after the pivot) and an after-chain.
pub fn quick_sort_sequential(store: &mut SequentialStore, key: impl Into<SortKey>, order: Order) {
    let sorted = quick_sort_chain(store, store.head(), key.into(), order);
    if let Some(seg) = sorted {
        store.set_next(seg.tail, None);
    }
    store.adopt_sequence(sorted.map(|seg| seg.head));
}

/// Sorts the chain at `chain`; the returned segment's tail link is
/// left dangling for the caller to set. The smaller partition is
/// sorted recursively and the larger one iteratively, so the stack
/// stays shallow on presorted input.
fn quick_sort_chain(
    store: &mut SequentialStore,
    mut chain: Option<NodeId>,
    key: SortKey,
    order: Order,
) -> Option<Segment> {
    let mut prefix: Option<Segment> = None;
    // Segments that belong after the part still being sorted,
    // innermost last.
    let mut suffixes: Vec<Segment> = Vec::new();

    while let Some(pivot) = chain {
        let mut rest = store.next_of(pivot);
        let (mut before, mut ties, mut after) = (None, None, None);
        let (mut before_len, mut after_len) = (0usize, 0usize);
        let mut ties_tail = None;
        let pivot_key = key.of(store.record(pivot)).into_owned();

        while let Some(node) = rest {
            rest = store.next_of(node);
            let (goes_before, ties_pivot) = {
                let node_key = key.of(store.record(node));
                (order.precedes(&node_key, &pivot_key), node_key == pivot_key.as_str())
            };
            if goes_before {
                store.set_next(node, before);
                before = Some(node);
                before_len += 1;
            } else if ties_pivot {
                store.set_next(node, ties);
                if ties.is_none() {
                    ties_tail = Some(node);
                }
                ties = Some(node);
            } else {
                store.set_next(node, after);
                after = Some(node);
                after_len += 1;
            }
        }

        store.set_next(pivot, ties);
        let middle = Segment { head: pivot, tail: ties_tail.unwrap_or(pivot) };

        if before_len <= after_len {
            // Finish `before` now, keep looping on `after`.
            let mut acc = prefix;
            if let Some(left) = quick_sort_chain(store, before, key, order) {
                acc = Some(splice(store, acc, left));
            }
            prefix = Some(splice(store, acc, middle));
            chain = after;
        } else {
            // Finish `after` now, keep looping on `before`.
            let right = quick_sort_chain(store, after, key, order);
            let tail_part = match right {
                Some(right) => splice(store, Some(middle), right),
                None => middle,
            };
            suffixes.push(tail_part);
            chain = before;
        }
    }

    let mut result = prefix;
    while let Some(seg) = suffixes.pop() {
        result = Some(splice(store, result, seg));
    }
    result
}

// ── Bubble sort ──────────────────────────────────────────────────────────────

/// Adjacent-exchange passes with positional swaps.
pub fn bubble_sort_indexed<S: RandomAccess + ?Sized>(
    store: &mut S,
    key: impl Into<SortKey>,
    order: Order,
) {
    let key = key.into();
    let n = store.len();
    for pass in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for j in 0..(n - 1 - pass) {
            if order.precedes(&key.of(store.get(j + 1)), &key.of(store.get(j))) {
                store.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}

/// Adjacent-exchange passes that swap node payloads, not links.
pub fn bubble_sort_sequential(store: &mut SequentialStore, key: impl Into<SortKey>, order: Order) {
    let key = key.into();
    let n = store.len();
    for pass in 0..n.saturating_sub(1) {
        let mut swapped = false;
        let mut cursor = store.head();
        for _ in 0..(n - 1 - pass) {
            let Some(node) = cursor else { break };
            let Some(next) = store.next_of(node) else { break };
            let out_of_order = order.precedes(&key.of(store.record(next)), &key.of(store.record(node)));
            if out_of_order {
                store.swap_payload(node, next);
                swapped = true;
            }
            cursor = Some(next);
        }
        if !swapped {
            break;
        }
    }
}
