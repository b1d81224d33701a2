//! Integration tests for write-alias reconciliation
//!
//! Drives a `ReconciliationLoop` through sequences of cluster events:
//! - Missing-alias detection (plain, non-write alias, rolled-over)
//! - Leader-only batch submission
//! - Self-healing after a failed submission
//! - Out-of-order events and idempotent re-evaluation

use indexguard_reconciler::metadata::{
    AliasBinding, AliasMetadata, AliasOrIndex, ClusterChangedEvent, ClusterSnapshot,
    IndexMetadata, NameCodec,
};
use indexguard_reconciler::{
    IndexGuardConfig, InMemoryAliasClient, MutationError, PolicyScope, ReconcileOutcome,
    ReconcilerPolicy, ReconciliationLoop,
};
use std::sync::Arc;
use tokio::runtime::Handle;

fn all_scope_policy() -> ReconcilerPolicy {
    ReconcilerPolicy::new(NameCodec::default(), PolicyScope::All)
}

fn leader_event(version: i64, indices: Vec<IndexMetadata>) -> ClusterChangedEvent {
    ClusterChangedEvent::metadata(
        ClusterSnapshot::from_indices(version, indices).unwrap(),
        true,
    )
}

#[test]
fn test_missing_write_alias_cases() {
    let policy = all_scope_policy();

    let snapshot = ClusterSnapshot::from_indices(
        1,
        vec![
            IndexMetadata::new("idx1-000001"),
            IndexMetadata::new("idx2-000001").with_alias(AliasBinding::read_only("idx2-alias")),
            IndexMetadata::new("idx3-000001"),
            IndexMetadata::new("idx3-000002").with_alias(AliasBinding::write("idx3-write")),
        ],
    )
    .unwrap();

    assert_eq!(
        policy.find_indices_missing_write_alias(&snapshot),
        vec!["idx1-000001", "idx2-000001"]
    );
}

#[test]
fn test_rolled_over_alias_entry_satisfies_initial_index() {
    let policy = all_scope_policy();

    let snapshot = ClusterSnapshot::from_entries(
        1,
        vec![
            AliasOrIndex::Index(IndexMetadata::new("idx3-000001")),
            AliasOrIndex::Alias(
                AliasMetadata::new("idx3-write", vec!["idx3-000004".to_string()])
                    .with_write_index("idx3-000004"),
            ),
        ],
    )
    .unwrap();

    assert!(policy.find_indices_missing_write_alias(&snapshot).is_empty());
}

#[test]
fn test_read_path_is_idempotent() {
    let policy = all_scope_policy();
    let snapshot = ClusterSnapshot::from_indices(
        7,
        vec![
            IndexMetadata::new("idx1-000001"),
            IndexMetadata::new("idx2-000001"),
        ],
    )
    .unwrap();
    let before = snapshot.clone();

    let first = policy.find_indices_missing_write_alias(&snapshot);
    let second = policy.find_indices_missing_write_alias(&snapshot);

    assert_eq!(first, second);
    assert_eq!(snapshot, before);
}

#[tokio::test]
async fn test_leader_closes_gap_then_settles() {
    let client = InMemoryAliasClient::new_in_memory();
    let rl = ReconciliationLoop::new(
        ReconcilerPolicy::default(),
        Arc::new(client.clone()),
        Handle::current(),
    );

    let ticket = rl
        .handle_event(leader_event(
            1,
            vec![
                IndexMetadata::new("app-orders-000001"),
                IndexMetadata::new("audit-k8s-000001"),
                IndexMetadata::new("kibana-000001"),
            ],
        ))
        .unwrap()
        .into_ticket()
        .unwrap();

    assert_eq!(ticket.indices(), &["app-orders-000001", "audit-k8s-000001"]);
    assert!(ticket.outcome().await.unwrap().is_acknowledged());

    // Cluster now reports the aliases the loop asked for
    let outcome = rl
        .handle_event(leader_event(
            2,
            vec![
                IndexMetadata::new("app-orders-000001")
                    .with_alias(AliasBinding::write("app-orders-write")),
                IndexMetadata::new("audit-k8s-000001")
                    .with_alias(AliasBinding::write("audit-k8s-write")),
                IndexMetadata::new("kibana-000001"),
            ],
        ))
        .unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Satisfied));
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn test_only_leader_submits() {
    let client = InMemoryAliasClient::new_in_memory();
    let rl = ReconciliationLoop::new(all_scope_policy(), Arc::new(client.clone()), Handle::current());

    for version in 1..=3 {
        let outcome = rl
            .handle_event(ClusterChangedEvent::metadata(
                ClusterSnapshot::from_indices(version, vec![IndexMetadata::new("idx1-000001")])
                    .unwrap(),
                false,
            ))
            .unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Follower));
    }

    assert_eq!(rl.store().version(), 3);
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_failed_submission_heals_on_next_event() {
    let client = InMemoryAliasClient::new_in_memory();
    client.fail_next(MutationError::new("master not discovered").with_cause("timeout"));
    let rl = ReconciliationLoop::new(all_scope_policy(), Arc::new(client.clone()), Handle::current());

    let failed = rl
        .handle_event(leader_event(1, vec![IndexMetadata::new("idx1-000001")]))
        .unwrap()
        .into_ticket()
        .unwrap()
        .outcome()
        .await
        .unwrap();
    assert!(!failed.is_acknowledged());

    // Unrelated metadata change re-triggers the same action
    let healed = rl
        .handle_event(leader_event(
            2,
            vec![
                IndexMetadata::new("idx1-000001"),
                IndexMetadata::new("idx9-000003"),
            ],
        ))
        .unwrap()
        .into_ticket()
        .unwrap()
        .outcome()
        .await
        .unwrap();
    assert!(healed.is_acknowledged());

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].actions, requests[1].actions);
    assert_ne!(requests[0].request_id, requests[1].request_id);
}

#[tokio::test]
async fn test_out_of_order_events_keep_newest_snapshot() {
    let client = InMemoryAliasClient::new_in_memory();
    let rl = ReconciliationLoop::new(all_scope_policy(), Arc::new(client.clone()), Handle::current());

    let newer = ClusterSnapshot::from_indices(
        10,
        vec![IndexMetadata::new("idx1-000001").with_alias(AliasBinding::write("idx1-write"))],
    )
    .unwrap();
    let older = ClusterSnapshot::from_indices(4, vec![IndexMetadata::new("idx1-000001")]).unwrap();

    rl.handle_event(ClusterChangedEvent::metadata(newer.clone(), true))
        .unwrap();
    let outcome = rl
        .handle_event(ClusterChangedEvent::metadata(older, true))
        .unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Satisfied));
    assert_eq!(*rl.store().current(), newer);
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_reconcile_now_reuses_unchanged_snapshot() {
    let client = InMemoryAliasClient::new_in_memory();
    let rl = ReconciliationLoop::new(all_scope_policy(), Arc::new(client.clone()), Handle::current());

    rl.handle_event(ClusterChangedEvent::metadata(
        ClusterSnapshot::from_indices(1, vec![IndexMetadata::new("idx1-000001")]).unwrap(),
        false,
    ))
    .unwrap();

    let first = rl.reconcile_now(true).unwrap().into_ticket().unwrap();
    let second = rl.reconcile_now(true).unwrap().into_ticket().unwrap();
    assert_eq!(first.indices(), second.indices());

    first.outcome().await.unwrap();
    second.outcome().await.unwrap();
    assert_eq!(client.request_count(), 2);
    assert_eq!(rl.store().version(), 1);
}

#[tokio::test]
async fn test_legacy_suffix_from_config() {
    let config = IndexGuardConfig::from_yaml_str(
        r#"
version: 1
naming:
  initial_index_suffix: "-00001"
policy:
  scope: all
"#,
    )
    .unwrap();

    let client = InMemoryAliasClient::new_in_memory();
    let rl = ReconciliationLoop::from_config(&config, Arc::new(client.clone()), Handle::current())
        .unwrap();

    let ticket = rl
        .handle_event(leader_event(
            1,
            vec![
                IndexMetadata::new("logs-00001"),
                IndexMetadata::new("metrics-000001"),
            ],
        ))
        .unwrap()
        .into_ticket()
        .unwrap();

    assert_eq!(ticket.indices(), &["logs-00001"]);
    ticket.outcome().await.unwrap();
    assert_eq!(client.requests()[0].actions[0].alias, "logs-write");
}
