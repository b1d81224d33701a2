use indexguard_metadata::MetadataError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcilerError>;

#[derive(Error, Debug)]
pub enum ReconcilerError {
    /// A routing target names a plain index where a write alias was required
    #[error("Alias expected but '{target}' resolves to an index")]
    AliasExpected { target: String },

    #[error("Alias mutation submission failed for {indices:?}: {message}")]
    MutationSubmissionFailed {
        indices: Vec<String>,
        message: String,
    },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Submission task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ReconcilerError {
    pub fn alias_expected(target: impl Into<String>) -> Self {
        Self::AliasExpected {
            target: target.into(),
        }
    }

    pub fn serialization<E: std::fmt::Display>(e: E) -> Self {
        Self::Serialization(e.to_string())
    }

    /// Transient errors are absorbed (logged, re-attempted on the next event);
    /// permanent ones are surfaced to the caller.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReconcilerError::MutationSubmissionFailed { .. } | ReconcilerError::Join(_) => {
                ErrorCategory::Transient
            }
            ReconcilerError::AliasExpected { .. }
            | ReconcilerError::InvalidStateTransition { .. }
            | ReconcilerError::Metadata(_)
            | ReconcilerError::Config(_)
            | ReconcilerError::Serialization(_) => ErrorCategory::Permanent,
        }
    }
}

/// Error category deciding whether an error is absorbed or surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCategory {
    /// Absorbed locally; the next metadata event re-attempts
    Transient,
    /// Structural inconsistency; never guessed around
    Permanent,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transient => "transient",
            ErrorCategory::Permanent => "permanent",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "transient" => Ok(ErrorCategory::Transient),
            "permanent" => Ok(ErrorCategory::Permanent),
            _ => Err(ReconcilerError::serialization(format!(
                "Invalid error category: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing version field in YAML
    #[error("Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_roundtrip() {
        for category in &[ErrorCategory::Transient, ErrorCategory::Permanent] {
            let parsed = ErrorCategory::from_str(category.as_str()).unwrap();
            assert_eq!(*category, parsed);
        }
    }

    #[test]
    fn test_error_category_invalid() {
        assert!(ErrorCategory::from_str("infrastructure").is_err());
    }

    #[test]
    fn test_alias_expected_is_permanent() {
        let err = ReconcilerError::alias_expected("app-foo-write");
        assert_eq!(err.category(), ErrorCategory::Permanent);
        assert_eq!(
            err.to_string(),
            "Alias expected but 'app-foo-write' resolves to an index"
        );
    }

    #[test]
    fn test_submission_failure_is_transient() {
        let err = ReconcilerError::MutationSubmissionFailed {
            indices: vec!["app-foo-000001".to_string()],
            message: "node disconnected".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Transient);
        assert!(err.to_string().contains("app-foo-000001"));
        assert!(err.to_string().contains("node disconnected"));
    }

    #[test]
    fn test_unsupported_version_message() {
        let err = ConfigError::UnsupportedVersion {
            found: 3,
            supported: vec![1],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported configuration version 3. Supported versions: 1"
        );
    }
}
