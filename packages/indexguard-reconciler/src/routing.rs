//! Ingest-time routing to write aliases
//!
//! Documents addressed to a managed write alias (`app-logs-write`) are
//! redirected to the initial index (`app-logs-000001`) while the alias does
//! not exist yet, so ingestion does not wait for reconciliation. Once the
//! alias exists, the document keeps the alias and storage resolves it to the
//! current write member.

use indexguard_metadata::{AliasOrIndex, ClusterSnapshot, NameCodec, SnapshotStore};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::IndexGuardConfig;
use crate::error::{ReconcilerError, Result};

/// Processor type name under which the processor is registered
pub const PROCESSOR_TYPE: &str = "write-alias-router";

/// Decide the final write target for `target` against one snapshot.
///
/// Unrelated names pass through unchanged. A missing alias falls back to the
/// initial index. A name that resolves to a plain index is an error.
pub fn route(codec: &NameCodec, target: &str, snapshot: &ClusterSnapshot) -> Result<String> {
    if !codec.has_managed_prefix(target) || !codec.is_write_alias(target) {
        return Ok(target.to_string());
    }

    match snapshot.get(target) {
        None => Ok(codec.initial_index_name(target)),
        Some(AliasOrIndex::Index(_)) => Err(ReconcilerError::alias_expected(target)),
        Some(AliasOrIndex::Alias(_)) => Ok(target.to_string()),
    }
}

/// Document flowing through the ingest pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestDocument {
    source: Map<String, Value>,
}

impl IngestDocument {
    pub fn new(source: Map<String, Value>) -> Self {
        Self { source }
    }

    /// # Errors
    ///
    /// Returns `ReconcilerError::Serialization` unless `value` is a JSON object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(source) => Ok(Self::new(source)),
            other => Err(ReconcilerError::serialization(format!(
                "document must be a JSON object, got: {}",
                other
            ))),
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.source.contains_key(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.source.get(field).and_then(Value::as_str)
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.source.insert(field.into(), value.into());
    }

    pub fn source(&self) -> &Map<String, Value> {
        &self.source
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.source)
    }
}

/// Rewrites a document's target field according to the current alias state
#[derive(Debug, Clone)]
pub struct RoutingProcessor {
    tag: String,
    codec: NameCodec,
    target_field: String,
    store: Arc<SnapshotStore>,
}

impl RoutingProcessor {
    pub fn new(
        tag: impl Into<String>,
        codec: NameCodec,
        target_field: impl Into<String>,
        store: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            tag: tag.into(),
            codec,
            target_field: target_field.into(),
            store,
        }
    }

    pub fn processor_type(&self) -> &'static str {
        PROCESSOR_TYPE
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn target_field(&self) -> &str {
        &self.target_field
    }

    /// Route `target` against the latest snapshot
    pub fn route(&self, target: &str) -> Result<String> {
        let snapshot = self.store.current();
        route(&self.codec, target, &snapshot)
    }

    /// Rewrite the document's target field in place.
    ///
    /// Documents without the field, with a non-string value, or with a blank
    /// value pass through untouched.
    ///
    /// # Errors
    ///
    /// `ReconcilerError::AliasExpected` when the target names a plain index;
    /// the document must not be written.
    pub fn execute(&self, document: &mut IngestDocument) -> Result<()> {
        let target = match document.get_str(&self.target_field) {
            Some(target) if !target.trim().is_empty() => target.to_string(),
            _ => {
                trace!(tag = %self.tag, field = %self.target_field, "no routing target, document unchanged");
                return Ok(());
            }
        };

        let routed = self.route(&target)?;
        if routed != target {
            debug!(
                tag = %self.tag,
                "write alias {} not found, routing to initial index {}",
                target,
                routed
            );
            document.set_field(self.target_field.clone(), routed);
        }
        Ok(())
    }
}

/// Creates routing processors bound to one snapshot store
#[derive(Debug, Clone)]
pub struct ProcessorFactory {
    codec: NameCodec,
    target_field: String,
    store: Arc<SnapshotStore>,
}

impl ProcessorFactory {
    pub fn new(config: &IndexGuardConfig, store: Arc<SnapshotStore>) -> Self {
        Self {
            codec: config.name_codec(),
            target_field: config.routing.target_field.clone(),
            store,
        }
    }

    pub fn processor_type(&self) -> &'static str {
        PROCESSOR_TYPE
    }

    pub fn create(&self, tag: impl Into<String>) -> RoutingProcessor {
        RoutingProcessor::new(
            tag,
            self.codec.clone(),
            self.target_field.clone(),
            Arc::clone(&self.store),
        )
    }
}
