//! Write-alias completeness policy
//!
//! An initial index (`<stem>-000001`) is satisfied when its expected write
//! alias name (`<stem>-write`) is present in the snapshot, whatever that alias
//! currently points to. This covers indices that already rolled over: their
//! write alias lives on a newer index.
//!
//! The `is_write_index` flags embedded in an index's own bindings are not
//! consulted. An index carrying only non-write aliases, or a write alias under
//! a name other than the expected one, is reported as missing.

use indexguard_metadata::{ClusterSnapshot, NameCodec};
use serde::{Deserialize, Serialize};

use crate::config::IndexGuardConfig;
use crate::transport::AliasAction;

/// Which indices the policy looks at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyScope {
    /// Only indices whose name carries a managed prefix
    #[default]
    Managed,
    /// Every index in the snapshot
    All,
}

impl PolicyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyScope::Managed => "managed",
            PolicyScope::All => "all",
        }
    }
}

impl std::fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerPolicy {
    codec: NameCodec,
    scope: PolicyScope,
}

impl ReconcilerPolicy {
    pub fn new(codec: NameCodec, scope: PolicyScope) -> Self {
        Self { codec, scope }
    }

    pub fn from_config(config: &IndexGuardConfig) -> Self {
        Self::new(config.name_codec(), config.policy.scope)
    }

    pub fn codec(&self) -> &NameCodec {
        &self.codec
    }

    pub fn scope(&self) -> PolicyScope {
        self.scope
    }

    fn in_scope(&self, name: &str) -> bool {
        match self.scope {
            PolicyScope::Managed => self.codec.has_managed_prefix(name),
            PolicyScope::All => true,
        }
    }

    /// Initial indices whose expected write alias is absent, in lexical order
    pub fn find_indices_missing_write_alias(&self, snapshot: &ClusterSnapshot) -> Vec<String> {
        snapshot
            .indices()
            .filter(|(name, _)| self.in_scope(name))
            .filter(|(name, _)| self.codec.is_initial_index(name))
            .filter(|(name, _)| !snapshot.contains(&self.codec.write_alias_name(name)))
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// One `add` action per missing index, in lexical index order.
    ///
    /// Indices whose derived alias name is blank get no action.
    pub fn plan_write_aliases(&self, snapshot: &ClusterSnapshot) -> Vec<AliasAction> {
        self.find_indices_missing_write_alias(snapshot)
            .into_iter()
            .filter_map(|index| {
                let alias = self.codec.write_alias_name(&index);
                if alias.trim().is_empty() {
                    return None;
                }
                Some(AliasAction::add_write_alias(index, alias))
            })
            .collect()
    }
}

impl Default for ReconcilerPolicy {
    fn default() -> Self {
        Self::new(NameCodec::default(), PolicyScope::default())
    }
}
