// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval and lifecycle command specs

use std::time::Duration;

use crate::prelude::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approve_during_reconciliation_is_never_reverted() {
    let fleet = Fleet::new();
    fleet.controller.attach("10.0.0.5", "agent1", None);
    fleet.reconcile().await;
    let id = fleet.record("10.0.0.5", "agent1").id.unwrap();

    for round in 0..20u16 {
        fleet.controller.set_port("10.0.0.5", "agent1", 13000 + round);
        let approved = round % 2 == 0;

        let pass = tokio::spawn({
            let manager = fleet.manager.clone();
            async move { manager.reconcile_now().await }
        });
        let approval = tokio::spawn({
            let manager = fleet.manager.clone();
            let id = id.clone();
            async move { manager.approve(&id, approved) }
        });
        pass.await.unwrap().unwrap();
        approval.await.unwrap().unwrap().unwrap();

        let record = fleet.manager.get_agent(&id).unwrap().unwrap();
        assert_eq!(record.approved, Some(approved), "round {round}");
        assert_eq!(record.port, 13000 + round, "round {round}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn hung_control_channel_does_not_block_approval() {
    let fleet = Fleet::new();
    fleet.controller.attach("10.0.0.5", "agent1", None);
    fleet.reconcile().await;
    let id = fleet.record("10.0.0.5", "agent1").id.unwrap();
    fleet.controller.pause_snapshots();

    let pass = tokio::spawn({
        let manager = fleet.manager.clone();
        async move { manager.reconcile_now().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let approved = tokio::time::timeout(Duration::from_secs(1), async {
        fleet.manager.approve(&id, true)
    })
    .await
    .expect("approve blocked behind snapshot");
    assert_eq!(approved.unwrap().unwrap().approved, Some(true));

    fleet.controller.resume_snapshots();
    pass.await.unwrap().unwrap();
    assert_eq!(fleet.record("10.0.0.5", "agent1").approved, Some(true));
}

#[tokio::test]
async fn stop_and_update_reach_only_attached_agents() {
    let fleet = Fleet::with_config(ControllerConfig::default().controller_version("3.6.0"));
    fleet.controller.attach("10.0.0.5", "up", None);
    fleet.controller.attach("10.0.0.6", "down", None);
    fleet.reconcile().await;
    let up = fleet.record("10.0.0.5", "up").id.unwrap();
    let down = fleet.record("10.0.0.6", "down").id.unwrap();
    fleet.controller.detach("10.0.0.6", "down");

    assert!(fleet.manager.stop(&up).await.unwrap());
    assert!(fleet.manager.force_update(&up).await.unwrap());
    assert!(!fleet.manager.stop(&down).await.unwrap());
    assert!(!fleet.manager.force_update(&down).await.unwrap());

    let key = AgentKey::new("10.0.0.5", "up");
    assert_eq!(
        fleet.controller.calls(),
        vec![
            TransportCall::Stop { key: key.clone() },
            TransportCall::Update { key, version: "3.6.0".to_string() },
        ]
    );
}

#[tokio::test]
async fn unknown_ids_are_quiet_noops() {
    let fleet = Fleet::new();
    let missing = AgentId::from_string("agt-missing");

    assert!(fleet.manager.approve(&missing, true).unwrap().is_none());
    assert!(fleet.manager.get_agent(&missing).unwrap().is_none());
    assert!(!fleet.manager.stop(&missing).await.unwrap());
    assert!(!fleet.manager.force_update(&missing).await.unwrap());
}
