// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation specs
//!
//! Verify persisted records follow attached agents.

use crate::prelude::*;

#[tokio::test]
async fn new_agent_appears_with_auto_approval() {
    let fleet = Fleet::with_config(ControllerConfig::default().auto_approve(true));
    fleet.controller.attach("10.0.0.5", "agent1", None);
    let before = fleet.manager.cache_invalidations();

    let summary = fleet.reconcile().await;

    assert_eq!(summary.created, 1);
    assert_eq!(fleet.store.len(), 1);
    let record = fleet.record("10.0.0.5", "agent1");
    assert_eq!(record.approved, Some(true));
    assert_eq!(record.state, AgentState::Ready);
    assert!(fleet.manager.cache_invalidations() > before);
}

#[tokio::test]
async fn agent_disappears_and_goes_inactive() {
    let fleet = Fleet::new();
    fleet.controller.attach("10.0.0.5", "agent1", None);
    fleet.controller.attach("10.0.0.6", "agent2", None);
    fleet.reconcile().await;
    let before = fleet.manager.cache_invalidations();

    fleet.controller.detach("10.0.0.5", "agent1");
    fleet.reconcile().await;

    assert_eq!(fleet.store.len(), 2);
    assert_eq!(fleet.record("10.0.0.5", "agent1").state, AgentState::Inactive);
    assert_eq!(fleet.record("10.0.0.6", "agent2").state, AgentState::Ready);
    assert!(fleet.manager.cache_invalidations() > before);
    assert_eq!(fleet.manager.list_active_agents().unwrap().len(), 1);
}

#[tokio::test]
async fn repeated_pass_is_idempotent() {
    let fleet = Fleet::new();
    fleet.controller.attach("10.0.0.5", "agent1", Some("US"));
    fleet.controller.attach("10.0.0.5", "agent2", Some("US_owned_alice"));
    fleet.reconcile().await;
    let snapshot = fleet.store.find_all().unwrap();
    let invalidations = fleet.manager.cache_invalidations();

    let summary = fleet.reconcile().await;

    assert_eq!(summary.writes(), 0);
    assert_eq!(fleet.manager.cache_invalidations(), invalidations);
    let after = fleet.store.find_all().unwrap();
    assert_eq!(after.len(), snapshot.len());
    for (a, b) in after.iter().zip(&snapshot) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.state, b.state);
    }
}

#[tokio::test]
async fn duplicate_rows_collapse_to_one_live_record() {
    let fleet = Fleet::new();
    for _ in 0..3 {
        fleet
            .store
            .save(AgentRecord::builder().ip("10.0.0.5").name("agent1").state(AgentState::Busy).build())
            .unwrap();
    }
    fleet.controller.attach("10.0.0.5", "agent1", None);

    let summary = fleet.reconcile().await;

    assert_eq!(summary.updated, 1);
    assert_eq!(summary.orphaned, 2);
    let states: Vec<_> = fleet.store.find_all().unwrap().into_iter().map(|r| r.state).collect();
    assert_eq!(states, vec![AgentState::Ready, AgentState::Inactive, AgentState::Inactive]);
    assert_eq!(fleet.reconcile().await.writes(), 0);
}

#[tokio::test]
async fn live_source_outage_leaves_records_alone() {
    let fleet = Fleet::new();
    fleet.controller.attach("10.0.0.5", "agent1", None);
    fleet.reconcile().await;

    fleet.controller.fail_snapshots(true);
    assert!(fleet.manager.reconcile_now().await.is_err());
    assert_eq!(fleet.record("10.0.0.5", "agent1").state, AgentState::Ready);
}
