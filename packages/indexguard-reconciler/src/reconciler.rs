use indexguard_metadata::{ClusterChangedEvent, SnapshotStore, UpdateOutcome};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::config::IndexGuardConfig;
use crate::error::{ReconcilerError, Result};
use crate::phase::PhaseMachine;
use crate::policy::ReconcilerPolicy;
use crate::transport::{AliasMutationClient, AliasMutationRequest};

/// Completion of one alias mutation submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Acknowledged {
        request_id: Uuid,
        indices: Vec<String>,
    },
    Failed {
        request_id: Uuid,
        indices: Vec<String>,
        message: String,
    },
}

impl SubmissionOutcome {
    pub fn request_id(&self) -> Uuid {
        match self {
            SubmissionOutcome::Acknowledged { request_id, .. }
            | SubmissionOutcome::Failed { request_id, .. } => *request_id,
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self, SubmissionOutcome::Acknowledged { .. })
    }

    /// The failure as an error value, if the submission failed
    pub fn error(&self) -> Option<ReconcilerError> {
        match self {
            SubmissionOutcome::Acknowledged { .. } => None,
            SubmissionOutcome::Failed {
                indices, message, ..
            } => Some(ReconcilerError::MutationSubmissionFailed {
                indices: indices.clone(),
                message: message.clone(),
            }),
        }
    }
}

/// Handle on an in-flight submission.
///
/// Dropping the ticket detaches the task; the submission still completes and
/// logs its result.
#[derive(Debug)]
pub struct SubmissionTicket {
    request_id: Uuid,
    indices: Vec<String>,
    handle: JoinHandle<SubmissionOutcome>,
}

impl SubmissionTicket {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    /// Wait for the transport's reply
    pub async fn outcome(self) -> Result<SubmissionOutcome> {
        Ok(self.handle.await?)
    }
}

/// What one event (or explicit re-evaluation) led to
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// The event carried no metadata change
    Ignored,
    /// This node is not the leader; nothing was submitted
    Follower,
    /// Leader, and every initial index already has its write alias
    Satisfied,
    /// Leader, and one batch request was submitted
    Submitted(SubmissionTicket),
}

impl ReconcileOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, ReconcileOutcome::Submitted(_))
    }

    pub fn ticket(&self) -> Option<&SubmissionTicket> {
        match self {
            ReconcileOutcome::Submitted(ticket) => Some(ticket),
            _ => None,
        }
    }

    pub fn into_ticket(self) -> Option<SubmissionTicket> {
        match self {
            ReconcileOutcome::Submitted(ticket) => Some(ticket),
            _ => None,
        }
    }
}

/// Cluster-metadata change handler.
///
/// Every event updates the snapshot store. On the leader, the current snapshot
/// is checked for initial indices without a write alias and the gap is closed
/// with one batch request. Submission is fire-and-forget: failures are logged
/// and the next event re-evaluates from scratch.
pub struct ReconciliationLoop {
    store: Arc<SnapshotStore>,
    policy: ReconcilerPolicy,
    client: Arc<dyn AliasMutationClient>,
    runtime: Handle,
}

impl ReconciliationLoop {
    /// Create a loop with its own, empty snapshot store
    pub fn new(
        policy: ReconcilerPolicy,
        client: Arc<dyn AliasMutationClient>,
        runtime: Handle,
    ) -> Self {
        Self {
            store: Arc::new(SnapshotStore::new()),
            policy,
            client,
            runtime,
        }
    }

    /// # Errors
    ///
    /// Returns `ReconcilerError::Config` if `config` fails validation.
    pub fn from_config(
        config: &IndexGuardConfig,
        client: Arc<dyn AliasMutationClient>,
        runtime: Handle,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(ReconcilerPolicy::from_config(config), client, runtime))
    }

    /// Store owned by this loop; routing processors read from it
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    pub fn policy(&self) -> &ReconcilerPolicy {
        &self.policy
    }

    /// Handle one cluster-metadata notification
    pub fn handle_event(&self, event: ClusterChangedEvent) -> Result<ReconcileOutcome> {
        if !event.metadata_changed {
            trace!(version = event.version, "no metadata change, event ignored");
            return Ok(ReconcileOutcome::Ignored);
        }

        let is_leader = event.local_node_leader;
        let mut machine = PhaseMachine::new();

        machine.begin_apply()?;
        match self.store.apply(event.into_snapshot()) {
            UpdateOutcome::Applied { previous, current } => {
                debug!(previous, current, "cluster snapshot updated");
            }
            UpdateOutcome::Stale { current, offered } => {
                trace!(current, offered, "stale cluster snapshot ignored");
            }
        }
        machine.finish_apply(is_leader)?;

        if !is_leader {
            return Ok(ReconcileOutcome::Follower);
        }
        self.reconcile(&mut machine)
    }

    /// Handle one notification in its JSON form
    ///
    /// # Errors
    ///
    /// `ReconcilerError::Metadata` if `json` is not a valid event.
    pub fn handle_json_event(&self, json: &str) -> Result<ReconcileOutcome> {
        let event = ClusterChangedEvent::from_json(json)?;
        self.handle_event(event)
    }

    /// Re-evaluate the current snapshot without a new event.
    ///
    /// Intended for an external periodic trigger; `is_leader` must come from
    /// the caller's current view of mastership. No snapshot is applied.
    pub fn reconcile_now(&self, is_leader: bool) -> Result<ReconcileOutcome> {
        if !is_leader {
            return Ok(ReconcileOutcome::Follower);
        }

        let mut machine = PhaseMachine::new();
        machine.begin_reconcile()?;
        self.reconcile(&mut machine)
    }

    fn reconcile(&self, machine: &mut PhaseMachine) -> Result<ReconcileOutcome> {
        let snapshot = self.store.current();
        let planned = self.policy.plan_write_aliases(&snapshot);

        // The alias may have been created since `snapshot` was taken
        let latest = self.store.current();
        let actions: Vec<_> = planned
            .into_iter()
            .filter(|action| !latest.contains(&action.alias))
            .collect();

        let outcome = if actions.is_empty() {
            trace!(version = snapshot.version(), "all write aliases present");
            ReconcileOutcome::Satisfied
        } else {
            ReconcileOutcome::Submitted(self.submit(AliasMutationRequest::new(actions)))
        };

        machine.finish_reconcile()?;
        Ok(outcome)
    }

    fn submit(&self, request: AliasMutationRequest) -> SubmissionTicket {
        let request_id = request.request_id;
        let indices = request.indices();
        info!(
            request_id = %request_id,
            "Submitting write aliases for {} indices: {:?}",
            indices.len(),
            indices
        );

        let client = Arc::clone(&self.client);
        let task_indices = indices.clone();
        let handle = self.runtime.spawn(async move {
            match client.update_aliases(request).await {
                Ok(_) => {
                    debug!(
                        request_id = %request_id,
                        "Write aliases added for the following indices: {:?}",
                        task_indices
                    );
                    SubmissionOutcome::Acknowledged {
                        request_id,
                        indices: task_indices,
                    }
                }
                Err(e) => {
                    info!(
                        request_id = %request_id,
                        "Error occurred when adding write aliases for the following indices: {:?}. {}",
                        task_indices,
                        e
                    );
                    SubmissionOutcome::Failed {
                        request_id,
                        indices: task_indices,
                        message: e.to_string(),
                    }
                }
            }
        });

        SubmissionTicket {
            request_id,
            indices,
            handle,
        }
    }
}
