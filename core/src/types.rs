//! Shared primitive types used across the whole crate.

/// A stable, unique identifier for a transaction record.
pub type RecordId = String;

/// 0-based position of a record in a store's current order.
pub type Position = usize;

/// Handle of a node inside a sequential store's arena.
pub type NodeId = usize;
