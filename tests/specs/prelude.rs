// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for fleet specs.

use std::sync::Arc;

pub use fleet_adapters::{FakeController, TransportCall};
pub use fleet_core::{AgentId, AgentKey, AgentRecord, AgentState, ControllerConfig, NONE_REGION};
use fleet_engine::{AgentManager, ManagerDeps};
pub use fleet_storage::{AgentStore, FileAgentStore};
use tempfile::TempDir;

/// A manager over a fake control channel and a file-backed store.
pub struct Fleet {
    pub controller: FakeController,
    pub store: Arc<FileAgentStore>,
    pub manager: Arc<AgentManager<FakeController, FakeController>>,
    _dir: TempDir,
}

impl Fleet {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileAgentStore::open(dir.path().join("agents.json")).unwrap());
        let controller = FakeController::new();
        let deps = ManagerDeps {
            registry: controller.clone(),
            transport: controller.clone(),
            store: store.clone(),
        };
        let manager = Arc::new(AgentManager::new(deps, &config));
        Self { controller, store, manager, _dir: dir }
    }

    pub async fn reconcile(&self) -> fleet_engine::ReconcileSummary {
        self.manager.reconcile_now().await.unwrap()
    }

    /// The single stored record for a key.
    pub fn record(&self, ip: &str, name: &str) -> AgentRecord {
        let key = AgentKey::new(ip, name);
        let mut matching: Vec<_> =
            self.store.find_all().unwrap().into_iter().filter(|r| r.key() == key).collect();
        assert_eq!(matching.len(), 1, "expected exactly one record for {key}");
        matching.remove(0)
    }
}
