// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot-backed agent store.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use fleet_core::{AgentId, AgentRecord, LiveHandle};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::snapshot::{backup_snapshot, load_snapshot, write_snapshot, Snapshot};
use crate::store::{AgentStore, StoreError};

/// Agent store held in memory and mirrored to a snapshot file on every
/// write.
///
/// A batch is applied to a copy of the table, the copy is written to disk,
/// and only then is it swapped in, so a failed write changes nothing.
pub struct FileAgentStore {
    agents: RwLock<IndexMap<AgentId, AgentRecord>>,
    path: Option<PathBuf>,
    fail_writes: AtomicBool,
}

impl FileAgentStore {
    /// Open the store at `path`, loading the existing snapshot if any.
    ///
    /// A loaded snapshot is copied to a rotating backup before the first
    /// write can replace it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut agents = IndexMap::new();
        match load_snapshot(&path)? {
            Some(snapshot) => {
                info!(path = %path.display(), count = snapshot.agents.len(), "loaded agent snapshot");
                for record in snapshot.agents {
                    match record.id.clone() {
                        Some(id) => {
                            agents.insert(id, record);
                        }
                        None => warn!(agent = %record.key(), "dropping snapshot row without an id"),
                    }
                }
                backup_snapshot(&path)?;
            }
            None => info!(path = %path.display(), "no agent snapshot, starting empty"),
        }
        Ok(Self { agents: RwLock::new(agents), path: Some(path), fail_writes: AtomicBool::new(false) })
    }

    /// Store without a backing file.
    pub fn in_memory() -> Self {
        Self { agents: RwLock::new(IndexMap::new()), path: None, fail_writes: AtomicBool::new(false) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }

    /// Make every following write fail until cleared.
    #[cfg(any(test, feature = "test-support"))]
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn write(&self, records: Vec<AgentRecord>) -> Result<Vec<AgentRecord>, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("writes disabled".to_string()));
        }

        let mut agents = self.agents.write();
        let mut next = agents.clone();
        let mut saved = Vec::with_capacity(records.len());
        for mut record in records {
            let id = record.id.get_or_insert_with(AgentId::generate).clone();
            let mut stored = record.clone();
            stored.identity = LiveHandle::default();
            next.insert(id, stored);
            saved.push(record);
        }

        if let Some(path) = &self.path {
            write_snapshot(path, &Snapshot::new(next.values().cloned().collect()))?;
        }
        debug!(count = saved.len(), total = next.len(), "agent records saved");
        *agents = next;
        Ok(saved)
    }
}

impl AgentStore for FileAgentStore {
    fn find_all(&self) -> Result<Vec<AgentRecord>, StoreError> {
        Ok(self.agents.read().values().cloned().collect())
    }

    fn find_by_id(&self, id: &AgentId) -> Result<Option<AgentRecord>, StoreError> {
        Ok(self.agents.read().get(id).cloned())
    }

    fn save(&self, record: AgentRecord) -> Result<AgentRecord, StoreError> {
        let mut saved = self.write(vec![record])?;
        saved.pop().ok_or_else(|| StoreError::Rejected("empty save".to_string()))
    }

    fn save_all(&self, records: Vec<AgentRecord>) -> Result<Vec<AgentRecord>, StoreError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        self.write(records)
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod tests;
