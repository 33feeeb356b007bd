// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store contract consumed by the reconciliation engine.

use fleet_core::{AgentId, AgentRecord};
use thiserror::Error;

use crate::snapshot::SnapshotError;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Predicates the store can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentFilter {
    Active,
    Visible,
}

impl AgentFilter {
    pub fn matches(self, record: &AgentRecord) -> bool {
        match self {
            Self::Active => record.state.is_active(),
            Self::Visible => record.state.is_visible(),
        }
    }
}

/// Durable CRUD over agent records.
///
/// The store does not enforce natural-key uniqueness; duplicate `(ip, name)`
/// rows are resolved by the reconciliation engine. Records returned from
/// reads never carry a live handle.
pub trait AgentStore: Send + Sync + 'static {
    /// Every record, in a stable order (oldest first).
    fn find_all(&self) -> Result<Vec<AgentRecord>, StoreError>;

    /// Records matching a predicate, in the same order as [`AgentStore::find_all`].
    fn find_matching(&self, filter: AgentFilter) -> Result<Vec<AgentRecord>, StoreError> {
        let mut records = self.find_all()?;
        records.retain(|r| filter.matches(r));
        Ok(records)
    }

    fn find_by_id(&self, id: &AgentId) -> Result<Option<AgentRecord>, StoreError>;

    /// Insert or replace one record, assigning an ID if it has none.
    fn save(&self, record: AgentRecord) -> Result<AgentRecord, StoreError>;

    /// Insert or replace a batch atomically: either every record lands or
    /// none does.
    fn save_all(&self, records: Vec<AgentRecord>) -> Result<Vec<AgentRecord>, StoreError>;
}
