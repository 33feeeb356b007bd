// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon restart specs
//!
//! Verify records and approvals survive a daemon restart.

use fleet_daemon::{startup, Config};
use serial_test::serial;

use crate::prelude::*;

#[tokio::test]
#[serial]
async fn approval_survives_restart_and_detach() {
    std::env::remove_var("FLEET_AUTO_APPROVE");
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_state_dir(dir.path());
    let controller = FakeController::new();
    controller.attach("10.0.0.5", "agent1", None);

    let daemon = startup(&config, controller.clone(), controller.clone()).await.unwrap();
    let id = daemon.store.find_all().unwrap()[0].id.clone().unwrap();
    daemon.manager.approve(&id, true).unwrap();
    daemon.shutdown().await;

    controller.detach("10.0.0.5", "agent1");
    let daemon = startup(&config, controller.clone(), controller.clone()).await.unwrap();

    let record = daemon.manager.get_agent(&id).unwrap().unwrap();
    assert_eq!(record.state, AgentState::Inactive);
    assert_eq!(record.approved, Some(true));

    // The snapshot on disk is the documented JSON layout
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.store_path).unwrap()).unwrap();
    assert_eq!(raw["v"], 1);
    assert_eq!(raw["agents"].as_array().unwrap().len(), 1);
    daemon.shutdown().await;
}
