// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Approval policy for agents.

use fleet_core::{AgentId, AgentRecord, ControllerConfig};
use fleet_storage::{AgentStore, StoreError};
use tracing::info;

/// Decides the approval of first-seen agents and applies explicit
/// approve/disapprove decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalGate {
    auto_approve: bool,
}

impl ApprovalGate {
    pub fn new(auto_approve: bool) -> Self {
        Self { auto_approve }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.auto_approve)
    }

    /// Approval given to an agent the first time it is seen.
    pub fn default_approval(&self) -> bool {
        self.auto_approve
    }

    /// Persist an explicit decision. `Ok(None)` when no record has `id`.
    ///
    /// Only the approval flag is written; every other field is taken from
    /// the stored record as read here.
    pub fn set_approval(
        &self,
        store: &dyn AgentStore,
        id: &AgentId,
        approved: bool,
    ) -> Result<Option<AgentRecord>, StoreError> {
        let Some(mut record) = store.find_by_id(id)? else {
            return Ok(None);
        };
        record.approved = Some(approved);
        let saved = store.save(record)?;
        info!(agent_id = %id, agent = %saved.key(), approved, "agent approval changed");
        Ok(Some(saved))
    }
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
