use crate::error::{ReconcilerError, Result};
use serde::{Deserialize, Serialize};

/// Phase of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePhase {
    Idle,
    ApplyingSnapshot,
    LeaderReconciling,
}

impl ReconcilePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcilePhase::Idle => "idle",
            ReconcilePhase::ApplyingSnapshot => "applying_snapshot",
            ReconcilePhase::LeaderReconciling => "leader_reconciling",
        }
    }
}

impl std::fmt::Display for ReconcilePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phase transitions for a single event.
///
/// A machine lives for one event and is dropped afterwards; nothing carries
/// over to the next event.
#[derive(Debug)]
pub struct PhaseMachine {
    phase: ReconcilePhase,
    trail: Vec<ReconcilePhase>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: ReconcilePhase::Idle,
            trail: vec![ReconcilePhase::Idle],
        }
    }

    pub fn phase(&self) -> ReconcilePhase {
        self.phase
    }

    /// Every phase visited, starting with `Idle`
    pub fn trail(&self) -> &[ReconcilePhase] {
        &self.trail
    }

    fn enter(&mut self, next: ReconcilePhase) {
        self.phase = next;
        self.trail.push(next);
    }

    fn invalid(&self, to: ReconcilePhase) -> ReconcilerError {
        ReconcilerError::InvalidStateTransition {
            from: self.phase.to_string(),
            to: to.to_string(),
        }
    }

    /// Transition: IDLE → APPLYING_SNAPSHOT
    pub fn begin_apply(&mut self) -> Result<()> {
        match self.phase {
            ReconcilePhase::Idle => {
                self.enter(ReconcilePhase::ApplyingSnapshot);
                Ok(())
            }
            _ => Err(self.invalid(ReconcilePhase::ApplyingSnapshot)),
        }
    }

    /// Transition: APPLYING_SNAPSHOT → LEADER_RECONCILING (leader) or IDLE
    pub fn finish_apply(&mut self, is_leader: bool) -> Result<()> {
        let next = if is_leader {
            ReconcilePhase::LeaderReconciling
        } else {
            ReconcilePhase::Idle
        };

        match self.phase {
            ReconcilePhase::ApplyingSnapshot => {
                self.enter(next);
                Ok(())
            }
            _ => Err(self.invalid(next)),
        }
    }

    /// Transition: IDLE → LEADER_RECONCILING, re-evaluating the snapshot
    /// already held without applying a new one
    pub fn begin_reconcile(&mut self) -> Result<()> {
        match self.phase {
            ReconcilePhase::Idle => {
                self.enter(ReconcilePhase::LeaderReconciling);
                Ok(())
            }
            _ => Err(self.invalid(ReconcilePhase::LeaderReconciling)),
        }
    }

    /// Transition: LEADER_RECONCILING → IDLE
    pub fn finish_reconcile(&mut self) -> Result<()> {
        match self.phase {
            ReconcilePhase::LeaderReconciling => {
                self.enter(ReconcilePhase::Idle);
                Ok(())
            }
            _ => Err(self.invalid(ReconcilePhase::Idle)),
        }
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}
