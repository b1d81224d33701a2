//! Infrastructure layer - in-process snapshot storage

pub mod snapshot_store;

pub use snapshot_store::{SnapshotStore, UpdateOutcome};
