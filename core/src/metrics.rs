//! Timing and memory instrumentation for store operations.

use crate::{
    record::Record,
    store::{Backend, RecordStore},
    types::NodeId,
};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Wall-clock timer for a single operation.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Estimated memory held by one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Footprint {
    pub backend:      Backend,
    pub records:      usize,
    pub inline_bytes: usize,
    pub heap_bytes:   usize,
    pub link_bytes:   usize,
}

impl Footprint {
    pub fn total_bytes(&self) -> usize {
        self.inline_bytes + self.heap_bytes + self.link_bytes
    }
}

/// Estimate the bytes a store holds: record structs, their string
/// buffers, and for sequential stores one link per node.
pub fn footprint(store: &dyn RecordStore) -> Footprint {
    let records = store.len();
    let heap_bytes = store.iter().map(Record::heap_bytes).sum();
    let link_bytes = match store.backend() {
        Backend::Indexed    => 0,
        Backend::Sequential => records * std::mem::size_of::<Option<NodeId>>(),
    };
    Footprint {
        backend: store.backend(),
        records,
        inline_bytes: records * std::mem::size_of::<Record>(),
        heap_bytes,
        link_bytes,
    }
}

/// Human-readable byte count (KiB/MiB).
pub fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.2} MiB", b / MIB)
    } else if b >= KIB {
        format!("{:.2} KiB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}
