//! Configuration (YAML v1)
//!
//! ```yaml
//! version: 1
//! naming:
//!   write_alias_suffix: "-write"
//!   initial_index_suffix: "-000001"
//!   managed_prefixes: ["app-", "infra-", "audit-"]
//! policy:
//!   scope: managed
//! routing:
//!   target_field: _index
//! ```
//!
//! Every section and field is optional except `version`; omitted values take
//! the defaults shown above.

use indexguard_metadata::{
    NameCodec, DEFAULT_INITIAL_INDEX_SUFFIX, DEFAULT_MANAGED_PREFIXES, DEFAULT_WRITE_ALIAS_SUFFIX,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::policy::PolicyScope;

pub const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// Default document field read and rewritten by the routing processor
pub const DEFAULT_TARGET_FIELD: &str = "_index";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub write_alias_suffix: String,
    pub initial_index_suffix: String,
    pub managed_prefixes: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            write_alias_suffix: DEFAULT_WRITE_ALIAS_SUFFIX.to_string(),
            initial_index_suffix: DEFAULT_INITIAL_INDEX_SUFFIX.to_string(),
            managed_prefixes: DEFAULT_MANAGED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub scope: PolicyScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    pub target_field: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            target_field: DEFAULT_TARGET_FIELD.to_string(),
        }
    }
}

/// YAML schema v1 (file layout)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFileV1 {
    version: Option<u32>,
    #[serde(default)]
    naming: NamingConfig,
    #[serde(default)]
    policy: PolicyConfig,
    #[serde(default)]
    routing: RoutingConfig,
}

/// Validated runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexGuardConfig {
    pub naming: NamingConfig,
    pub policy: PolicyConfig,
    pub routing: RoutingConfig,
}

impl IndexGuardConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = Self {
            naming: file.naming,
            policy: file.policy,
            routing: file.routing,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(SUPPORTED_VERSIONS[0]),
            naming: self.naming.clone(),
            policy: self.policy.clone(),
            routing: self.routing.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let naming = &self.naming;
        if naming.write_alias_suffix.is_empty() {
            return Err(ConfigError::invalid_field(
                "naming.write_alias_suffix",
                "must not be empty",
            ));
        }
        if naming.initial_index_suffix.is_empty() {
            return Err(ConfigError::invalid_field(
                "naming.initial_index_suffix",
                "must not be empty",
            ));
        }
        if naming.write_alias_suffix == naming.initial_index_suffix {
            return Err(ConfigError::invalid_field(
                "naming.initial_index_suffix",
                "must differ from naming.write_alias_suffix",
            ));
        }
        if naming.managed_prefixes.is_empty() {
            return Err(ConfigError::invalid_field(
                "naming.managed_prefixes",
                "at least one prefix is required",
            ));
        }
        if let Some(pos) = naming.managed_prefixes.iter().position(|p| p.is_empty()) {
            return Err(ConfigError::invalid_field(
                format!("naming.managed_prefixes[{}]", pos),
                "must not be empty",
            ));
        }
        if self.routing.target_field.trim().is_empty() {
            return Err(ConfigError::invalid_field(
                "routing.target_field",
                "must not be blank",
            ));
        }
        Ok(())
    }

    pub fn name_codec(&self) -> NameCodec {
        NameCodec::new(
            self.naming.write_alias_suffix.clone(),
            self.naming.initial_index_suffix.clone(),
            self.naming.managed_prefixes.iter().cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = IndexGuardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.name_codec(), NameCodec::default());
        assert_eq!(config.policy.scope, PolicyScope::Managed);
        assert_eq!(config.routing.target_field, "_index");
    }

    #[test]
    fn test_yaml_minimal() {
        let config = IndexGuardConfig::from_yaml_str("version: 1\n").unwrap();
        assert_eq!(config, IndexGuardConfig::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
version: 1
naming:
  initial_index_suffix: "-00001"
  managed_prefixes: ["app-"]
policy:
  scope: all
"#;
        let config = IndexGuardConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.naming.initial_index_suffix, "-00001");
        assert_eq!(config.naming.write_alias_suffix, "-write");
        assert_eq!(config.naming.managed_prefixes, vec!["app-"]);
        assert_eq!(config.policy.scope, PolicyScope::All);

        let codec = config.name_codec();
        assert_eq!(codec.initial_index_name("app-foo-write"), "app-foo-00001");
    }

    #[test]
    fn test_yaml_missing_version() {
        let err = IndexGuardConfig::from_yaml_str("policy:\n  scope: all\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let err = IndexGuardConfig::from_yaml_str("version: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let err = IndexGuardConfig::from_yaml_str("version: 1\nretries: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_validate_rejects_equal_suffixes() {
        let yaml = r#"
version: 1
naming:
  write_alias_suffix: "-x"
  initial_index_suffix: "-x"
"#;
        let err = IndexGuardConfig::from_yaml_str(yaml).unwrap_err();
        match err {
            ConfigError::InvalidField { field, .. } => {
                assert_eq!(field, "naming.initial_index_suffix")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validate_rejects_empty_prefix() {
        let mut config = IndexGuardConfig::default();
        config.naming.managed_prefixes.push(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("naming.managed_prefixes[3]"));
    }

    #[test]
    fn test_validate_rejects_blank_target_field() {
        let mut config = IndexGuardConfig::default();
        config.routing.target_field = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = IndexGuardConfig::default();
        config.policy.scope = PolicyScope::All;

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("scope: all"));

        let reloaded = IndexGuardConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_yaml_loading_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"version: 1\nrouting:\n  target_field: target\n")
            .unwrap();

        let config = IndexGuardConfig::from_yaml(temp_file.path()).unwrap();
        assert_eq!(config.routing.target_field, "target");
    }
}
