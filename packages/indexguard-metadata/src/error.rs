//! Error types for indexguard-metadata

use std::fmt;
use thiserror::Error;

/// Metadata error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A name resolves to both an index and an alias
    AmbiguousName,
    /// An alias entry is inconsistent with its member indices
    InconsistentAlias,
    /// Serialization/deserialization errors
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AmbiguousName => "ambiguous_name",
            ErrorKind::InconsistentAlias => "inconsistent_alias",
            ErrorKind::Serialization => "serialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct MetadataError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl MetadataError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn ambiguous_name(name: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::AmbiguousName,
            format!("Name is both an index and an alias: {}", name.into()),
        )
    }

    pub fn inconsistent_alias(alias: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::InconsistentAlias,
            format!("Alias {}: {}", alias.into(), message),
        )
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        MetadataError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MetadataError>;
