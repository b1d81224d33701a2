/*
 * indexguard reconciler - write-alias reconciliation and ingest routing
 *
 * Architecture:
 * - Reconciliation loop driven by cluster-metadata change events
 * - Version-gated snapshot store shared with routing processors
 * - Write-alias completeness policy
 * - Fire-and-forget batch alias mutation (pluggable transport)
 * - Ingest-time routing with initial-index fallback
 */

// Public modules
pub mod config;
pub mod error;
pub mod phase;
pub mod policy;
pub mod reconciler;
pub mod routing;
pub mod transport;

// Re-exports
pub use config::{IndexGuardConfig, NamingConfig, PolicyConfig, RoutingConfig};
pub use error::{ConfigError, ConfigResult, ErrorCategory, ReconcilerError, Result};
pub use phase::{PhaseMachine, ReconcilePhase};
pub use policy::{PolicyScope, ReconcilerPolicy};
pub use reconciler::{ReconcileOutcome, ReconciliationLoop, SubmissionOutcome, SubmissionTicket};
pub use routing::{route, IngestDocument, ProcessorFactory, RoutingProcessor, PROCESSOR_TYPE};
pub use transport::{
    Acknowledged, AliasAction, AliasActionKind, AliasMutationClient, AliasMutationRequest,
    InMemoryAliasClient, MutationError,
};

pub use indexguard_metadata as metadata;
