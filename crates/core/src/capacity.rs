// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-user agent capacity.

use crate::agent_record::AgentRecord;
use crate::region;

/// How many agents one user may drive: the agents reserved for them plus
/// a slice of the shared pool capped at `max_shared`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgentCapacity {
    /// Active, approved agents whose region is owned by the user
    pub owned: usize,
    /// Active, approved agents with no owner at all
    pub shared: usize,
    /// Ceiling applied to `shared`
    pub max_shared: usize,
}

impl AgentCapacity {
    /// Count `agents` for `user_id`. Inactive and unapproved agents are
    /// skipped, as are agents owned by somebody else.
    pub fn count<'a>(
        agents: impl IntoIterator<Item = &'a AgentRecord>,
        user_id: &str,
        max_shared: usize,
    ) -> Self {
        let mut capacity = Self { max_shared, ..Self::default() };
        for agent in agents {
            if !agent.is_approved() || !agent.state.is_active() {
                continue;
            }
            let agent_region = agent.region.as_deref();
            if region::is_owned_by(agent_region, user_id) {
                capacity.owned += 1;
            } else if !region::is_owned(agent_region) {
                capacity.shared += 1;
            }
        }
        capacity
    }

    pub fn available(&self) -> usize {
        self.shared.min(self.max_shared) + self.owned
    }
}

#[cfg(test)]
#[path = "capacity_tests.rs"]
mod tests;
