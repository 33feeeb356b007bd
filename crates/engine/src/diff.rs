// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure set difference between the live snapshot and persisted records.

use fleet_core::{AgentKey, AgentRecord, LiveAgent};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Records a reconciliation pass needs to write.
#[derive(Debug, Default)]
pub struct AgentDiff {
    /// Live agents with no persisted counterpart, approval already filled
    pub new: Vec<AgentRecord>,
    /// Persisted records whose live attributes changed, or that went
    /// inactive because their agent is no longer attached
    pub updated: Vec<AgentRecord>,
    /// Duplicate persisted rows for a key that was already taken, marked
    /// inactive. Only rows that actually changed state are listed.
    pub orphans: Vec<AgentRecord>,
    /// Keys that appeared more than once in the live snapshot
    pub duplicate_live: Vec<AgentKey>,
    /// Keys that appeared more than once in the persisted records
    pub duplicate_persisted: Vec<AgentKey>,
}

impl AgentDiff {
    /// True when the pass has nothing to write.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.orphans.is_empty()
    }

    pub fn write_count(&self) -> usize {
        self.new.len() + self.updated.len() + self.orphans.len()
    }

    /// Everything to persist, in one batch.
    pub fn into_writes(self) -> Vec<AgentRecord> {
        let mut writes = self.new;
        writes.extend(self.updated);
        writes.extend(self.orphans);
        writes
    }
}

/// Compare `live` against `persisted` and work out what to write.
///
/// - A live agent with no persisted record becomes a new record carrying
///   `default_approval`.
/// - A persisted record whose agent is attached is updated only when port,
///   state, region or normalized version differ. Approval is left alone.
/// - A persisted record whose agent is gone is marked inactive, unless it
///   already is.
/// - When several persisted rows share a key, the first one wins and the
///   rest are marked inactive.
/// - When the snapshot holds a key twice, the last entry wins.
///
/// Running the result through the store and diffing again against the
/// same snapshot yields an empty diff.
pub fn compute_diff(
    live: Vec<LiveAgent>,
    persisted: Vec<AgentRecord>,
    default_approval: bool,
) -> AgentDiff {
    let mut diff = AgentDiff::default();

    let mut live_by_key: IndexMap<AgentKey, LiveAgent> = IndexMap::with_capacity(live.len());
    for agent in live {
        let key = agent.key();
        if live_by_key.insert(key.clone(), agent).is_some() {
            diff.duplicate_live.push(key);
        }
    }

    let mut persisted_by_key: IndexMap<AgentKey, AgentRecord> =
        IndexMap::with_capacity(persisted.len());
    for mut record in persisted {
        match persisted_by_key.entry(record.key()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(slot) => {
                diff.duplicate_persisted.push(slot.key().clone());
                if record.mark_inactive() {
                    diff.orphans.push(record);
                }
            }
        }
    }

    for (key, mut record) in persisted_by_key {
        match live_by_key.shift_remove(&key) {
            Some(agent) => {
                if !record.matches_live(&agent) {
                    record.apply_live(&agent);
                    diff.updated.push(record);
                }
            }
            None => {
                if record.mark_inactive() {
                    diff.updated.push(record);
                }
            }
        }
    }

    for agent in live_by_key.values() {
        let mut record = AgentRecord::from_live(agent);
        record.fill_approval(default_approval);
        diff.new.push(record);
    }

    diff
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
