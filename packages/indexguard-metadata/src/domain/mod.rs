//! Domain layer: cluster alias/index metadata
//!
//! # Domain Models
//!
//! - `AliasBinding`: one alias attached to an index, with its tri-state write flag
//! - `IndexMetadata`: a physical index and the aliases bound to it
//! - `AliasMetadata`: an alias and the indices it points to
//! - `AliasOrIndex`: what a name in the cluster namespace resolves to
//! - `ClusterSnapshot`: versioned, immutable name → entry mapping
//!
//! # Examples
//!
//! ```rust
//! use indexguard_metadata::domain::{AliasBinding, ClusterSnapshot, IndexMetadata};
//!
//! let snapshot = ClusterSnapshot::from_indices(
//!     7,
//!     vec![
//!         IndexMetadata::new("app-logs-000001").with_alias(AliasBinding::write("app-logs-write")),
//!         IndexMetadata::new("app-audit-000001"),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(snapshot.version(), 7);
//! assert!(snapshot.get("app-logs-write").unwrap().is_alias());
//! assert!(!snapshot.get("app-audit-000001").unwrap().is_alias());
//! ```

pub mod event;
pub mod naming;

pub use event::ClusterChangedEvent;
pub use naming::{
    NameCodec, DEFAULT_INITIAL_INDEX_SUFFIX, DEFAULT_MANAGED_PREFIXES, DEFAULT_WRITE_ALIAS_SUFFIX,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{MetadataError, Result};

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// An alias attached to an index.
///
/// `is_write_index` is tri-state: `Some(true)`, `Some(false)`, or unset.
/// Unset is treated as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasBinding {
    pub alias: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_write_index: Option<bool>,
}

impl AliasBinding {
    /// Binding with the write flag left unset
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            is_write_index: None,
        }
    }

    /// Binding marked as the write target
    pub fn write(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            is_write_index: Some(true),
        }
    }

    /// Binding explicitly marked as not the write target
    pub fn read_only(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            is_write_index: Some(false),
        }
    }

    pub fn is_write_index(&self) -> bool {
        self.is_write_index.unwrap_or(false)
    }
}

/// A physical index and its alias bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub name: String,
    /// Bindings keyed by alias name
    #[serde(default)]
    pub aliases: BTreeMap<String, AliasBinding>,
}

impl IndexMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: BTreeMap::new(),
        }
    }

    /// Attach an alias binding (replaces a binding with the same alias name)
    pub fn with_alias(mut self, binding: AliasBinding) -> Self {
        self.aliases.insert(binding.alias.clone(), binding);
        self
    }
}

/// An alias and the indices it points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasMetadata {
    pub name: String,
    /// Member indices, sorted
    pub indices: Vec<String>,
    /// The member index receiving writes through this alias, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_index: Option<String>,
}

impl AliasMetadata {
    pub fn new(name: impl Into<String>, indices: Vec<String>) -> Self {
        let mut indices = indices;
        indices.sort();
        indices.dedup();
        Self {
            name: name.into(),
            indices,
            write_index: None,
        }
    }

    pub fn with_write_index(mut self, index: impl Into<String>) -> Self {
        let index = index.into();
        if let Err(pos) = self.indices.binary_search(&index) {
            self.indices.insert(pos, index.clone());
        }
        self.write_index = Some(index);
        self
    }

    pub fn write_index(&self) -> Option<&str> {
        self.write_index.as_deref()
    }
}

/// What a name in the cluster namespace resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AliasOrIndex {
    Index(IndexMetadata),
    Alias(AliasMetadata),
}

impl AliasOrIndex {
    pub fn name(&self) -> &str {
        match self {
            AliasOrIndex::Index(index) => &index.name,
            AliasOrIndex::Alias(alias) => &alias.name,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, AliasOrIndex::Alias(_))
    }

    pub fn as_index(&self) -> Option<&IndexMetadata> {
        match self {
            AliasOrIndex::Index(index) => Some(index),
            AliasOrIndex::Alias(_) => None,
        }
    }

    pub fn as_alias(&self) -> Option<&AliasMetadata> {
        match self {
            AliasOrIndex::Alias(alias) => Some(alias),
            AliasOrIndex::Index(_) => None,
        }
    }
}

/// Immutable, versioned view of the cluster's index/alias namespace.
///
/// A snapshot is never mutated after construction; newer cluster state is
/// represented by a new snapshot with a higher version.
///
/// Entries are keyed by name and iterate in lexical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    version: i64,
    #[serde(default)]
    entries: BTreeMap<String, AliasOrIndex>,
}

impl ClusterSnapshot {
    /// Version carried by the empty snapshot held before any update is accepted
    pub const UNVERSIONED: i64 = i64::MIN;

    pub fn empty() -> Self {
        Self {
            version: Self::UNVERSIONED,
            entries: BTreeMap::new(),
        }
    }

    /// Create a snapshot from an already-keyed mapping. Keys are authoritative.
    pub fn new(version: i64, entries: BTreeMap<String, AliasOrIndex>) -> Self {
        Self { version, entries }
    }

    /// Create a snapshot keyed by each entry's own name.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::AmbiguousName` if two entries share a name.
    pub fn from_entries(
        version: i64,
        entries: impl IntoIterator<Item = AliasOrIndex>,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            let name = entry.name().to_string();
            if map.insert(name.clone(), entry).is_some() {
                return Err(MetadataError::ambiguous_name(name));
            }
        }
        Ok(Self::new(version, map))
    }

    /// Create a snapshot from index metadata, deriving alias entries from the
    /// bindings carried by each index.
    ///
    /// # Errors
    ///
    /// - `ErrorKind::AmbiguousName` if an alias shares its name with an index
    ///   (or two indices share a name)
    /// - `ErrorKind::InconsistentAlias` if an alias has more than one write member
    pub fn from_indices(
        version: i64,
        indices: impl IntoIterator<Item = IndexMetadata>,
    ) -> Result<Self> {
        let indices: Vec<IndexMetadata> = indices.into_iter().collect();

        let mut aliases: BTreeMap<String, AliasMetadata> = BTreeMap::new();
        for index in &indices {
            for binding in index.aliases.values() {
                let alias = aliases
                    .entry(binding.alias.clone())
                    .or_insert_with(|| AliasMetadata::new(binding.alias.clone(), Vec::new()));

                if binding.is_write_index() {
                    if let Some(existing) = alias.write_index() {
                        return Err(MetadataError::inconsistent_alias(
                            &binding.alias,
                            format!(
                                "write index claimed by both {} and {}",
                                existing, index.name
                            ),
                        ));
                    }
                    *alias = alias.clone().with_write_index(index.name.clone());
                } else if let Err(pos) = alias.indices.binary_search(&index.name) {
                    alias.indices.insert(pos, index.name.clone());
                }
            }
        }

        Self::from_entries(
            version,
            indices
                .into_iter()
                .map(AliasOrIndex::Index)
                .chain(aliases.into_values().map(AliasOrIndex::Alias)),
        )
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn get(&self, name: &str) -> Option<&AliasOrIndex> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All entries in lexical name order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &AliasOrIndex)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Plain index entries in lexical name order
    pub fn indices(&self) -> impl Iterator<Item = (&str, &IndexMetadata)> {
        self.entries()
            .filter_map(|(name, entry)| entry.as_index().map(|index| (name, index)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> BTreeMap<String, AliasOrIndex> {
        self.entries
    }
}

impl Default for ClusterSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
