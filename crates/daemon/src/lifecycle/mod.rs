// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown.

mod startup;
pub use startup::startup;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use fleet_adapters::{AgentTransport, AttachedAgents};
use fleet_core::{ConfigError, ControllerConfig, SystemClock};
use fleet_engine::AgentManager;
use fleet_storage::{FileAgentStore, StoreError};
use thiserror::Error;
use tracing::info;

use crate::scheduler::ReconcileScheduler;

/// Agent manager with the daemon's clock
pub type DaemonManager<R, T> = AgentManager<R, T, SystemClock>;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/fleet)
    pub state_dir: PathBuf,
    /// Controller settings file
    pub config_path: PathBuf,
    /// Agent record snapshot
    pub store_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Config {
    /// Load configuration for the user-level daemon.
    ///
    /// Uses fixed paths under `~/.local/state/fleet/` (or `$XDG_STATE_HOME/fleet/`).
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::for_state_dir(crate::env::state_dir()?))
    }

    pub fn for_state_dir(state_dir: impl AsRef<Path>) -> Self {
        let state_dir = state_dir.as_ref().to_path_buf();
        Self {
            config_path: state_dir.join("config.toml"),
            store_path: state_dir.join("agents.json"),
            log_path: state_dir.join("daemon.log"),
            state_dir,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState<R, T>
where
    R: AttachedAgents,
    T: AgentTransport,
{
    /// Configuration
    pub config: Config,
    /// Controller settings after environment overrides
    pub controller: ControllerConfig,
    /// Durable agent records
    pub store: Arc<FileAgentStore>,
    /// Reconciliation engine and admin operations
    pub manager: Arc<DaemonManager<R, T>>,
    /// When daemon started
    pub start_time: Instant,
    scheduler: ReconcileScheduler,
}

impl<R, T> DaemonState<R, T>
where
    R: AttachedAgents,
    T: AgentTransport,
{
    pub fn scheduler_stats(&self) -> Arc<crate::SchedulerStats> {
        self.scheduler.stats()
    }

    /// Stop the scheduler and wait for it. Records are already durable
    /// after every pass, so there is nothing to flush.
    pub async fn shutdown(self) {
        info!("Shutting down daemon...");
        let stats = self.scheduler.stats();
        self.scheduler.shutdown().await;
        info!(
            passes = stats.passes(),
            failures = stats.failures(),
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
