// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capacity specs

use crate::prelude::*;

#[tokio::test]
async fn shared_pool_is_capped_and_owned_agents_add_on() {
    let fleet = Fleet::with_config(
        ControllerConfig::default().auto_approve(true).max_shared_agents_per_console(3),
    );
    for i in 0..5 {
        fleet.controller.attach("10.0.1.1", &format!("shared{i}"), None);
    }
    fleet.controller.attach("10.0.2.1", "mine1", Some("US_owned_alice"));
    fleet.controller.attach("10.0.2.1", "mine2", Some("US_owned_alice"));
    fleet.controller.attach("10.0.3.1", "theirs", Some("US_owned_bob"));
    fleet.reconcile().await;

    let counts = fleet.manager.available_agent_count("alice").unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[NONE_REGION], 5);
    assert_eq!(fleet.manager.available_agent_count("bob").unwrap()[NONE_REGION], 4);
}

#[tokio::test]
async fn unapproved_agents_do_not_count() {
    let fleet = Fleet::new();
    fleet.controller.attach("10.0.1.1", "agent1", None);
    fleet.controller.attach("10.0.1.1", "agent2", None);
    fleet.reconcile().await;
    assert_eq!(fleet.manager.available_agent_count("alice").unwrap()[NONE_REGION], 0);

    let id = fleet.record("10.0.1.1", "agent1").id.unwrap();
    fleet.manager.approve(&id, true).unwrap();
    assert_eq!(fleet.manager.available_agent_count("alice").unwrap()[NONE_REGION], 1);
}
