//! Inbound cluster-metadata change notification

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AliasOrIndex, ClusterSnapshot};
use crate::Result;

/// One notification from the cluster-membership layer.
///
/// `local_node_leader` is only valid for this event; it must not be cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterChangedEvent {
    pub version: i64,
    pub metadata_changed: bool,
    pub local_node_leader: bool,
    #[serde(default)]
    pub entries: BTreeMap<String, AliasOrIndex>,
}

impl ClusterChangedEvent {
    /// Event carrying a metadata change
    pub fn metadata(snapshot: ClusterSnapshot, local_node_leader: bool) -> Self {
        Self {
            version: snapshot.version(),
            metadata_changed: true,
            local_node_leader,
            entries: snapshot.into_entries(),
        }
    }

    /// Event without a metadata change (e.g. routing table or node changes only)
    pub fn unchanged(version: i64, local_node_leader: bool) -> Self {
        Self {
            version,
            metadata_changed: false,
            local_node_leader,
            entries: BTreeMap::new(),
        }
    }

    /// Parse one event from its JSON form
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Serialization` if `json` is not a valid event.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_snapshot(self) -> ClusterSnapshot {
        ClusterSnapshot::new(self.version, self.entries)
    }
}
