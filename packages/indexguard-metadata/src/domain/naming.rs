//! Naming convention for write aliases and initial indices
//!
//! A managed domain `app-logs` owns:
//!
//! - the write alias `app-logs-write`
//! - the initial index `app-logs-000001`, created before any rollover
//!
//! All transforms are pure string substitutions; nothing here looks at the
//! cluster.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WRITE_ALIAS_SUFFIX: &str = "-write";
pub const DEFAULT_INITIAL_INDEX_SUFFIX: &str = "-000001";
pub const DEFAULT_MANAGED_PREFIXES: [&str; 3] = ["app-", "infra-", "audit-"];

/// String transforms between initial index names and write alias names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCodec {
    write_alias_suffix: String,
    initial_index_suffix: String,
    managed_prefixes: Vec<String>,
}

impl NameCodec {
    pub fn new(
        write_alias_suffix: impl Into<String>,
        initial_index_suffix: impl Into<String>,
        managed_prefixes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            write_alias_suffix: write_alias_suffix.into(),
            initial_index_suffix: initial_index_suffix.into(),
            managed_prefixes: managed_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn write_alias_suffix(&self) -> &str {
        &self.write_alias_suffix
    }

    pub fn initial_index_suffix(&self) -> &str {
        &self.initial_index_suffix
    }

    pub fn managed_prefixes(&self) -> &[String] {
        &self.managed_prefixes
    }

    /// `app-logs-write` → `app-logs-000001`
    ///
    /// A name without the write suffix gets the initial suffix appended as is:
    /// `app-logs` → `app-logs-000001`.
    pub fn initial_index_name(&self, alias_name: &str) -> String {
        let stem = alias_name
            .strip_suffix(self.write_alias_suffix.as_str())
            .unwrap_or(alias_name);
        format!("{}{}", stem, self.initial_index_suffix)
    }

    /// `app-logs-000001` → `app-logs-write`
    ///
    /// A name without the initial suffix gets the write suffix appended as is.
    pub fn write_alias_name(&self, index_name: &str) -> String {
        let stem = index_name
            .strip_suffix(self.initial_index_suffix.as_str())
            .unwrap_or(index_name);
        format!("{}{}", stem, self.write_alias_suffix)
    }

    pub fn is_initial_index(&self, name: &str) -> bool {
        name.ends_with(self.initial_index_suffix.as_str())
    }

    pub fn is_write_alias(&self, name: &str) -> bool {
        name.ends_with(self.write_alias_suffix.as_str())
    }

    pub fn has_managed_prefix(&self, name: &str) -> bool {
        self.managed_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

impl Default for NameCodec {
    fn default() -> Self {
        Self::new(
            DEFAULT_WRITE_ALIAS_SUFFIX,
            DEFAULT_INITIAL_INDEX_SUFFIX,
            DEFAULT_MANAGED_PREFIXES,
        )
    }
}
