//! Version-gated snapshot cell
//!
//! Holds exactly one live `ClusterSnapshot`. An update is accepted only if its
//! version is strictly greater than the stored one, so duplicate and
//! out-of-order notifications are dropped and readers never observe the
//! version going backwards.
//!
//! Writers compare-and-swap under the write lock; readers clone the `Arc`
//! under the read lock and keep it for the whole decision.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

use crate::domain::{AliasOrIndex, ClusterSnapshot};

/// Result of offering a snapshot to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The snapshot replaced the stored one
    Applied { previous: i64, current: i64 },
    /// The offered version was not newer; the store is unchanged
    Stale { current: i64, offered: i64 },
}

impl UpdateOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Applied { .. })
    }

    /// Version held by the store after the call
    pub fn current(&self) -> i64 {
        match self {
            UpdateOutcome::Applied { current, .. } | UpdateOutcome::Stale { current, .. } => {
                *current
            }
        }
    }
}

/// Single-writer/multi-reader snapshot cell
#[derive(Debug)]
pub struct SnapshotStore {
    cell: RwLock<Arc<ClusterSnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            cell: RwLock::new(Arc::new(ClusterSnapshot::empty())),
        }
    }

    /// Offer `(version, entries)`; accepted iff `version` is newer
    pub fn update(&self, version: i64, entries: BTreeMap<String, AliasOrIndex>) -> UpdateOutcome {
        self.apply(ClusterSnapshot::new(version, entries))
    }

    /// Offer a whole snapshot; accepted iff its version is newer
    pub fn apply(&self, snapshot: ClusterSnapshot) -> UpdateOutcome {
        let offered = snapshot.version();
        let candidate = Arc::new(snapshot);

        let mut cell = self.cell.write();
        let previous = cell.version();
        if offered <= previous {
            trace!(offered, current = previous, "stale snapshot ignored");
            return UpdateOutcome::Stale {
                current: previous,
                offered,
            };
        }

        *cell = candidate;
        trace!(previous, current = offered, "snapshot applied");
        UpdateOutcome::Applied {
            previous,
            current: offered,
        }
    }

    /// Latest accepted snapshot (empty before the first update)
    pub fn current(&self) -> Arc<ClusterSnapshot> {
        Arc::clone(&self.cell.read())
    }

    pub fn version(&self) -> i64 {
        self.cell.read().version()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
