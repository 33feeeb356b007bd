// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use std::sync::Arc;

use fleet_adapters::FakeController;
use fleet_core::{ControllerConfig, FakeClock};
use fleet_storage::FileAgentStore;

use crate::{AgentManager, ManagerDeps};

pub(crate) type TestManager = AgentManager<FakeController, FakeController, FakeClock>;

pub(crate) struct TestContext {
    pub manager: Arc<TestManager>,
    pub controller: FakeController,
    pub store: Arc<FileAgentStore>,
    pub clock: FakeClock,
}

pub(crate) fn setup() -> TestContext {
    setup_with(ControllerConfig::default())
}

pub(crate) fn setup_with(config: ControllerConfig) -> TestContext {
    let controller = FakeController::new();
    let store = Arc::new(FileAgentStore::in_memory());
    let clock = FakeClock::new();
    let deps = ManagerDeps {
        registry: controller.clone(),
        transport: controller.clone(),
        store: store.clone(),
    };
    let manager = Arc::new(AgentManager::with_clock(deps, &config, clock.clone()));
    TestContext { manager, controller, store, clock }
}
