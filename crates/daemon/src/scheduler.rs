// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic reconciliation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fleet_adapters::{AgentTransport, AttachedAgents};
use fleet_core::Clock;
use fleet_engine::AgentManager;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Pass counters, shared with the scheduler task.
#[derive(Debug, Default)]
pub struct SchedulerStats {
    passes: AtomicU64,
    failures: AtomicU64,
}

impl SchedulerStats {
    /// Passes that completed
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Passes that ended in an error
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Background task running one reconciliation pass per interval.
///
/// Passes never overlap. A failed pass is logged and the schedule carries
/// on. Cancelling stops new ticks; a pass already running is allowed to
/// finish.
pub struct ReconcileScheduler {
    cancel: CancellationToken,
    stats: Arc<SchedulerStats>,
    task: JoinHandle<()>,
}

impl ReconcileScheduler {
    /// Start ticking. The first pass runs one `period` from now.
    pub fn spawn<R, T, C>(manager: Arc<AgentManager<R, T, C>>, period: Duration) -> Self
    where
        R: AttachedAgents,
        T: AgentTransport,
        C: Clock,
    {
        let cancel = CancellationToken::new();
        let stats = Arc::new(SchedulerStats::default());
        let task = tokio::spawn(run(manager, period, cancel.clone(), Arc::clone(&stats)));
        Self { cancel, stats, task }
    }

    pub fn stats(&self) -> Arc<SchedulerStats> {
        Arc::clone(&self.stats)
    }

    /// Stop ticking and wait for the task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "reconcile scheduler task failed");
        }
    }
}

async fn run<R, T, C>(
    manager: Arc<AgentManager<R, T, C>>,
    period: Duration,
    cancel: CancellationToken,
    stats: Arc<SchedulerStats>,
) where
    R: AttachedAgents,
    T: AgentTransport,
    C: Clock,
{
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        match manager.reconcile_now().await {
            Ok(_) => {
                stats.passes.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                stats.failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "reconcile pass failed");
            }
        }
    }
    debug!(
        passes = stats.passes(),
        failures = stats.failures(),
        "reconcile scheduler stopped"
    );
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
