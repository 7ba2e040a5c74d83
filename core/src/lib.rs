//! txnscope-core: in-memory stores, sorting, searching and paging
//! for financial-transaction records.
//!
//! Data flow:
//!   ingest -> Workspace (per-channel stores) -> sort -> search -> paginate
//!
//! The algorithms never perform I/O. `ingest` and `export` take
//! readers and writers supplied by the caller.

pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod metrics;
pub mod paginate;
pub mod record;
pub mod rng;
pub mod sample;
pub mod search;
pub mod sort;
pub mod store;
pub mod types;
pub mod workspace;

pub use error::{ScopeError, ScopeResult};
pub use record::{Channel, Field, Record};
pub use store::{Backend, IndexedStore, RandomAccess, RecordStore, SequentialStore};
pub use workspace::Workspace;
