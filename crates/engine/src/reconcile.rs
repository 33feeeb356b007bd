// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One reconciliation pass: snapshot, diff, write, invalidate.

use fleet_adapters::{snapshot_live, AgentTransport, AttachedAgents};
use fleet_core::{Clock, LiveAgent};
use tracing::{debug, info, warn};

use crate::diff::compute_diff;
use crate::error::ReconcileError;
use crate::manager::AgentManager;

/// What a completed pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Agents in the live snapshot
    pub attached: usize,
    pub created: usize,
    pub updated: usize,
    /// Duplicate persisted rows marked inactive
    pub orphaned: usize,
    /// Whether the agent cache was dropped
    pub invalidated: bool,
}

impl ReconcileSummary {
    pub fn writes(&self) -> usize {
        self.created + self.updated + self.orphaned
    }
}

impl<R, T, C> AgentManager<R, T, C>
where
    R: AttachedAgents,
    T: AgentTransport,
    C: Clock,
{
    /// Run one pass now.
    ///
    /// All writes of the pass go to the store as one batch. On failure
    /// nothing was written and the cache is untouched. A pass started while
    /// another is running waits for it and then takes its own snapshot.
    pub async fn reconcile_now(&self) -> Result<ReconcileSummary, ReconcileError> {
        let _pass = self.pass_lock.lock().await;
        let live = snapshot_live(&self.registry, &self.transport).await?;
        self.apply_snapshot(live)
    }

    fn apply_snapshot(
        &self,
        live: Vec<LiveAgent>,
    ) -> Result<ReconcileSummary, ReconcileError> {
        let attached = live.len();
        let _guard = self.registry_lock.lock();

        let persisted = self.store.find_all()?;
        let diff = compute_diff(live, persisted, self.gate.default_approval());

        for key in &diff.duplicate_live {
            warn!(agent = %key, "agent attached more than once, keeping last connection");
        }
        for orphan in &diff.orphans {
            warn!(
                agent = %orphan.key(),
                agent_id = ?orphan.id,
                "duplicate agent record marked inactive"
            );
        }

        let mut summary = ReconcileSummary {
            attached,
            created: diff.new.len(),
            updated: diff.updated.len(),
            orphaned: diff.orphans.len(),
            invalidated: false,
        };
        if diff.is_empty() {
            debug!(attached, "agent records already current");
            return Ok(summary);
        }

        self.store.save_all(diff.into_writes())?;
        self.cache.invalidate();
        summary.invalidated = true;

        info!(
            attached,
            created = summary.created,
            updated = summary.updated,
            orphaned = summary.orphaned,
            "agent records reconciled"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
