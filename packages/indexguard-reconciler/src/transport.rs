//! Alias mutation port
//!
//! The reconciler hands one batch request per reconciliation to an
//! `AliasMutationClient`. The client owns delivery, timeouts and the reply;
//! the reconciler never retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasActionKind {
    Add,
}

/// One alias mutation inside a batch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasAction {
    pub action: AliasActionKind,
    pub index: String,
    pub alias: String,
    pub is_write_index: bool,
}

impl AliasAction {
    /// `add` action binding `alias` to `index` as its write alias
    pub fn add_write_alias(index: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            action: AliasActionKind::Add,
            index: index.into(),
            alias: alias.into(),
            is_write_index: true,
        }
    }
}

/// Batch of alias actions submitted as a single request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasMutationRequest {
    pub request_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub actions: Vec<AliasAction>,
}

impl AliasMutationRequest {
    pub fn new(actions: Vec<AliasAction>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            actions,
        }
    }

    /// Target indices, in action order
    pub fn indices(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.index.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Successful transport reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {
    pub acknowledged: bool,
}

/// Structured transport failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MutationError {
    pub message: String,
    pub cause: Option<String>,
}

impl MutationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Alias mutation transport
#[async_trait]
pub trait AliasMutationClient: Send + Sync {
    async fn update_aliases(
        &self,
        request: AliasMutationRequest,
    ) -> std::result::Result<Acknowledged, MutationError>;
}

/// In-process transport that records every request.
///
/// Failures queued with `fail_next` are returned in order, one per request.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAliasClient {
    requests: Arc<Mutex<Vec<AliasMutationRequest>>>,
    failures: Arc<Mutex<VecDeque<MutationError>>>,
}

impl InMemoryAliasClient {
    pub fn new_in_memory() -> Self {
        Self::default()
    }

    /// Make the next request fail with `error`
    pub fn fail_next(&self, error: MutationError) {
        self.failures.lock().push_back(error);
    }

    /// Every request received so far, including failed ones
    pub fn requests(&self) -> Vec<AliasMutationRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl AliasMutationClient for InMemoryAliasClient {
    async fn update_aliases(
        &self,
        request: AliasMutationRequest,
    ) -> std::result::Result<Acknowledged, MutationError> {
        self.requests.lock().push(request);

        match self.failures.lock().pop_front() {
            Some(error) => Err(error),
            None => Ok(Acknowledged { acknowledged: true }),
        }
    }
}
