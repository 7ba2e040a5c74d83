//! The operator's working set: one store per channel per backend.
//!
//! RULE: There is no ambient store state. Every operation takes the
//! `Workspace` (or a store borrowed from it) as a parameter.

use crate::{
    record::{Channel, Record},
    sort::{self, SortReport, SortSpec},
    store::{Backend, IndexedStore, RecordStore, SequentialStore},
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    indexed:     [IndexedStore; 4],
    sequential:  [SequentialStore; 4],
    limit:       Option<usize>,
    last_loaded: Option<Record>,
}

/// Outcome of one `Workspace::load`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records stored per channel (per backend; both backends get the same).
    pub per_channel:     BTreeMap<Channel, usize>,
    /// Records whose payment channel was not recognized.
    pub unknown_channel: usize,
    /// Records rejected by a capacity bound, summed over both backends.
    pub dropped:         usize,
}

impl LoadReport {
    pub fn stored(&self) -> usize {
        self.per_channel.values().sum()
    }

    pub fn count(&self, channel: Channel) -> usize {
        self.per_channel.get(&channel).copied().unwrap_or(0)
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A workspace whose stores each hold at most `limit` records.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            indexed:     std::array::from_fn(|_| IndexedStore::with_limit(limit)),
            sequential:  std::array::from_fn(|_| SequentialStore::with_limit(limit)),
            limit,
            last_loaded: None,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Replace the contents of every store with `records`, routed by
    /// payment channel. Records with an unknown channel are skipped.
    pub fn load<I>(&mut self, records: I) -> LoadReport
    where
        I: IntoIterator<Item = Record>,
    {
        self.clear();
        let mut report = LoadReport::default();

        for record in records {
            let Some(channel) = Channel::classify(&record.payment_channel) else {
                log::debug!(
                    "skipping {}: unknown channel '{}'",
                    record.transaction_id,
                    record.payment_channel
                );
                report.unknown_channel += 1;
                continue;
            };
            let slot = channel.index();
            let stored = self.sequential[slot].add(record.clone());
            if self.indexed[slot].add(record.clone()) && stored {
                *report.per_channel.entry(channel).or_insert(0) += 1;
            }
            self.last_loaded = Some(record);
        }

        report.dropped = Channel::ALL
            .iter()
            .map(|c| self.indexed[c.index()].dropped() + self.sequential[c.index()].dropped())
            .sum();
        for channel in Channel::ALL {
            report.per_channel.entry(channel).or_insert(0);
        }

        log::info!(
            "loaded {} records ({} unknown channel, {} dropped): {}",
            report.stored(),
            report.unknown_channel,
            report.dropped,
            Channel::ALL
                .iter()
                .map(|c| format!("{}={}", c.name(), report.count(*c)))
                .collect::<Vec<_>>()
                .join(" ")
        );
        report
    }

    /// Empty every store.
    pub fn clear(&mut self) {
        self.indexed.iter_mut().for_each(RecordStore::clear);
        self.sequential.iter_mut().for_each(RecordStore::clear);
        self.last_loaded = None;
    }

    /// The most recently routed record of the last load.
    pub fn last_loaded(&self) -> Option<&Record> {
        self.last_loaded.as_ref()
    }

    pub fn indexed(&self, channel: Channel) -> &IndexedStore {
        &self.indexed[channel.index()]
    }

    pub fn sequential(&self, channel: Channel) -> &SequentialStore {
        &self.sequential[channel.index()]
    }

    pub fn store(&self, channel: Channel, backend: Backend) -> &dyn RecordStore {
        match backend {
            Backend::Indexed    => &self.indexed[channel.index()],
            Backend::Sequential => &self.sequential[channel.index()],
        }
    }

    pub fn store_mut(&mut self, channel: Channel, backend: Backend) -> &mut dyn RecordStore {
        match backend {
            Backend::Indexed    => &mut self.indexed[channel.index()],
            Backend::Sequential => &mut self.sequential[channel.index()],
        }
    }

    /// Every channel's store for `backend`, in channel order.
    pub fn stores(&self, backend: Backend) -> Vec<&dyn RecordStore> {
        Channel::ALL.iter().map(|c| self.store(*c, backend)).collect()
    }

    pub fn total(&self, backend: Backend) -> usize {
        self.stores(backend).iter().map(|s| s.len()).sum()
    }

    pub fn sort_channel(&mut self, channel: Channel, backend: Backend, spec: &SortSpec) -> SortReport {
        sort::sort(self.store_mut(channel, backend), spec)
    }

    /// Sort every channel's store for `backend`.
    pub fn sort_all(&mut self, backend: Backend, spec: &SortSpec) -> Vec<(Channel, SortReport)> {
        Channel::ALL
            .iter()
            .map(|&c| (c, self.sort_channel(c, backend, spec)))
            .collect()
    }
}
