//! indexguard-metadata - versioned view of cluster indices and aliases
//!
//! ## Core Principles
//!
//! 1. **Immutable snapshots**: a `ClusterSnapshot` is replaced, never mutated
//! 2. **Version gate**: the store accepts a snapshot only if its version is newer
//! 3. **Pure naming**: alias/index name transforms never look at the cluster
//!
//! ## Usage
//!
//! ```rust
//! use indexguard_metadata::{ClusterSnapshot, IndexMetadata, NameCodec, SnapshotStore};
//!
//! let store = SnapshotStore::new();
//! let snapshot =
//!     ClusterSnapshot::from_indices(12, vec![IndexMetadata::new("app-logs-000001")]).unwrap();
//! assert!(store.apply(snapshot).is_applied());
//!
//! let codec = NameCodec::default();
//! let alias = codec.write_alias_name("app-logs-000001");
//! assert_eq!(alias, "app-logs-write");
//! assert!(!store.current().contains(&alias));
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{ErrorKind, MetadataError, Result};

pub use domain::{
    AliasBinding, AliasMetadata, AliasOrIndex, ClusterChangedEvent, ClusterSnapshot,
    IndexMetadata, NameCodec, DEFAULT_INITIAL_INDEX_SUFFIX, DEFAULT_MANAGED_PREFIXES,
    DEFAULT_WRITE_ALIAS_SUFFIX,
};
pub use infrastructure::{SnapshotStore, UpdateOutcome};
