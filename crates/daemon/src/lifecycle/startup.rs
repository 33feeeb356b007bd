// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::sync::Arc;
use std::time::Instant;

use fleet_adapters::{AgentTransport, AttachedAgents};
use fleet_core::ControllerConfig;
use fleet_engine::{AgentManager, ManagerDeps};
use fleet_storage::FileAgentStore;
use tracing::{info, warn};

use super::{Config, DaemonState, LifecycleError};
use crate::scheduler::ReconcileScheduler;

/// Start the daemon: open the store, run one pass, then keep reconciling
/// in the background.
///
/// A failed first pass is logged; the scheduler retries on the next tick.
pub async fn startup<R, T>(
    config: &Config,
    registry: R,
    transport: T,
) -> Result<DaemonState<R, T>, LifecycleError>
where
    R: AttachedAgents,
    T: AgentTransport,
{
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Controller settings: file, then environment
    let controller = crate::env::apply_overrides(ControllerConfig::load(&config.config_path)?);
    controller.validate()?;
    info!(
        auto_approve = controller.auto_approve,
        max_shared_agents = controller.max_shared_agents_per_console,
        interval_ms = controller.reconcile_interval_ms,
        version = %controller.controller_version,
        "loaded controller config"
    );

    // 3. Open the agent store
    let store = Arc::new(FileAgentStore::open(&config.store_path)?);
    info!(path = %config.store_path.display(), agents = store.len(), "opened agent store");

    // 4. Build the manager
    let deps = ManagerDeps { registry, transport, store: store.clone() };
    let manager = Arc::new(AgentManager::new(deps, &controller));

    // 5. First pass before serving, so listings start out current
    match manager.reconcile_now().await {
        Ok(summary) => info!(
            attached = summary.attached,
            created = summary.created,
            updated = summary.updated,
            "initial reconcile complete"
        ),
        Err(e) => warn!(error = %e, "initial reconcile failed"),
    }

    // 6. Periodic passes
    let scheduler = ReconcileScheduler::spawn(Arc::clone(&manager), controller.reconcile_interval());

    Ok(DaemonState {
        config: config.clone(),
        controller,
        store,
        manager,
        start_time: Instant::now(),
        scheduler,
    })
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
