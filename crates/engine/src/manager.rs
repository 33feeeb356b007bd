// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Administrative operations over the agent fleet.

use std::collections::HashMap;
use std::sync::Arc;

use fleet_adapters::{query_live, snapshot_live, AdapterError, AgentTransport, AttachedAgents};
use fleet_core::{
    AgentCapacity, AgentId, AgentIdentity, AgentKey, AgentRecord, Clock, ControllerConfig,
    LiveHandle, SystemClock, NONE_REGION,
};
use fleet_storage::{AgentFilter, AgentStore};
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::approval::ApprovalGate;
use crate::cache::AgentCache;
use crate::error::ServiceError;

/// External collaborators of an [`AgentManager`].
pub struct ManagerDeps<R, T> {
    pub registry: R,
    pub transport: T,
    pub store: Arc<dyn AgentStore>,
}

/// Keeps persisted agent records in step with the attached agents and
/// serves listing, approval and lifecycle commands.
///
/// Store read-modify-write sequences (a reconciliation pass, an approval)
/// run under one registry-wide lock. The live snapshot is always taken
/// outside that lock, so a slow control channel never blocks approvals.
/// Whole passes are serialized by a separate async lock held from snapshot
/// to write, so an older snapshot is never applied over a newer one.
pub struct AgentManager<R, T, C: Clock = SystemClock> {
    pub(crate) registry: R,
    pub(crate) transport: T,
    pub(crate) store: Arc<dyn AgentStore>,
    pub(crate) cache: AgentCache<C>,
    pub(crate) gate: ApprovalGate,
    pub(crate) registry_lock: Mutex<()>,
    pub(crate) pass_lock: tokio::sync::Mutex<()>,
    max_shared_agents: usize,
    controller_version: String,
}

impl<R, T> AgentManager<R, T, SystemClock>
where
    R: AttachedAgents,
    T: AgentTransport,
{
    pub fn new(deps: ManagerDeps<R, T>, config: &ControllerConfig) -> Self {
        Self::with_clock(deps, config, SystemClock)
    }
}

impl<R, T, C> AgentManager<R, T, C>
where
    R: AttachedAgents,
    T: AgentTransport,
    C: Clock,
{
    pub fn with_clock(deps: ManagerDeps<R, T>, config: &ControllerConfig, clock: C) -> Self {
        Self {
            registry: deps.registry,
            transport: deps.transport,
            store: deps.store,
            cache: AgentCache::new(config.reconcile_interval(), clock),
            gate: ApprovalGate::from_config(config),
            registry_lock: Mutex::new(()),
            pass_lock: tokio::sync::Mutex::new(()),
            max_shared_agents: config.max_shared_agents_per_console,
            controller_version: config.controller_version.clone(),
        }
    }

    pub fn approval_gate(&self) -> ApprovalGate {
        self.gate
    }

    /// Number of cache invalidations so far.
    pub fn cache_invalidations(&self) -> u64 {
        self.cache.invalidations()
    }

    // ── Listings ────────────────────────────────────────────────────────

    /// Every persisted agent, possibly up to one reconcile interval stale.
    pub fn list_agents(&self) -> Result<Vec<AgentRecord>, ServiceError> {
        Ok(self.cache.get_or_load(|| self.store.find_all())?)
    }

    pub fn list_active_agents(&self) -> Result<Vec<AgentRecord>, ServiceError> {
        self.list_cached(AgentFilter::Active)
    }

    pub fn list_visible_agents(&self) -> Result<Vec<AgentRecord>, ServiceError> {
        self.list_cached(AgentFilter::Visible)
    }

    /// Active agents read straight from the store, bypassing the cache.
    pub fn list_active_agents_from_store(&self) -> Result<Vec<AgentRecord>, ServiceError> {
        Ok(self.store.find_matching(AgentFilter::Active)?)
    }

    /// Visible agents read straight from the store, bypassing the cache.
    pub fn list_visible_agents_from_store(&self) -> Result<Vec<AgentRecord>, ServiceError> {
        Ok(self.store.find_matching(AgentFilter::Visible)?)
    }

    fn list_cached(&self, filter: AgentFilter) -> Result<Vec<AgentRecord>, ServiceError> {
        let mut agents = self.list_agents()?;
        agents.retain(|a| filter.matches(a));
        Ok(agents)
    }

    /// Every attached agent merged with what the store knows about it.
    ///
    /// Agents the store has never seen are shown with the default approval.
    /// Nothing is written.
    pub async fn list_attached_agents(&self) -> Result<Vec<AgentRecord>, ServiceError> {
        let live = snapshot_live(&self.registry, &self.transport)
            .await
            .map_err(ServiceError::SourceUnavailable)?;

        let mut persisted: IndexMap<AgentKey, AgentRecord> = IndexMap::new();
        for record in self.store.find_all()? {
            persisted.entry(record.key()).or_insert(record);
        }

        let mut attached: IndexMap<AgentKey, AgentRecord> = IndexMap::with_capacity(live.len());
        for agent in &live {
            let record = match persisted.get(&agent.key()) {
                Some(known) => {
                    let mut record = known.clone();
                    record.apply_live(agent);
                    record
                }
                None => {
                    let mut record = AgentRecord::from_live(agent);
                    record.fill_approval(self.gate.default_approval());
                    record
                }
            };
            attached.insert(agent.key(), record);
        }
        Ok(attached.into_values().collect())
    }

    // ── Lookups ─────────────────────────────────────────────────────────

    pub fn get_agent(&self, id: &AgentId) -> Result<Option<AgentRecord>, ServiceError> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Like [`AgentManager::get_agent`], but when the agent is connected the
    /// record carries its live handle and current live attributes.
    ///
    /// The stored row is not changed.
    pub async fn get_agent_with_identity(
        &self,
        id: &AgentId,
    ) -> Result<Option<AgentRecord>, ServiceError> {
        let Some(mut record) = self.get_agent(id)? else {
            return Ok(None);
        };
        let Some(identity) = self.find_attached_identity(&record.ip, &record.name).await? else {
            return Ok(Some(record));
        };
        record.identity = LiveHandle::new(&identity);
        match query_live(&self.transport, identity).await {
            Ok(live) => record.apply_live(&live),
            Err(AdapterError::NotAttached(key)) => {
                debug!(agent = %key, "agent detached during lookup");
                record.identity = LiveHandle::default();
            }
            Err(e) => return Err(ServiceError::SourceUnavailable(e)),
        }
        Ok(Some(record))
    }

    /// The attached connection for `(ip, name)`, if any. When the key is
    /// attached more than once the last connection listed wins.
    pub async fn find_attached_identity(
        &self,
        ip: &str,
        name: &str,
    ) -> Result<Option<Arc<AgentIdentity>>, ServiceError> {
        let attached = self.registry.attached().await.map_err(ServiceError::SourceUnavailable)?;
        Ok(attached.into_iter().filter(|i| i.ip == ip && i.name == name).last())
    }

    // ── Approval ────────────────────────────────────────────────────────

    /// Set approval on a record. `Ok(None)` when no record has `id`.
    ///
    /// A concurrent reconciliation pass never overwrites the decision.
    pub fn approve(
        &self,
        id: &AgentId,
        approved: bool,
    ) -> Result<Option<AgentRecord>, ServiceError> {
        let _guard = self.registry_lock.lock();
        let updated = self.gate.set_approval(self.store.as_ref(), id, approved)?;
        if updated.is_some() {
            self.cache.invalidate();
        }
        Ok(updated)
    }

    // ── Lifecycle commands ──────────────────────────────────────────────

    /// Ask the agent behind `id` to shut down.
    ///
    /// Returns whether a command was sent. Unknown ids and detached agents
    /// are a no-op.
    pub async fn stop(&self, id: &AgentId) -> Result<bool, ServiceError> {
        let Some(identity) = self.attached_identity_for(id).await? else {
            return Ok(false);
        };
        let sent = deliver(self.transport.stop_agent(&identity).await, &identity)?;
        if sent {
            info!(agent_id = %id, agent = %identity.key(), "stop sent");
        }
        Ok(sent)
    }

    /// Push the controller's own version to the agent behind `id`.
    ///
    /// Same no-op rules as [`AgentManager::stop`].
    pub async fn force_update(&self, id: &AgentId) -> Result<bool, ServiceError> {
        let Some(identity) = self.attached_identity_for(id).await? else {
            return Ok(false);
        };
        let sent = deliver(
            self.transport.push_update(&identity, &self.controller_version).await,
            &identity,
        )?;
        if sent {
            info!(
                agent_id = %id,
                agent = %identity.key(),
                version = %self.controller_version,
                "update pushed"
            );
        }
        Ok(sent)
    }

    async fn attached_identity_for(
        &self,
        id: &AgentId,
    ) -> Result<Option<Arc<AgentIdentity>>, ServiceError> {
        let record = {
            let _guard = self.registry_lock.lock();
            self.store.find_by_id(id)?
        };
        let Some(record) = record else {
            debug!(agent_id = %id, "no such agent");
            return Ok(None);
        };
        let identity = self.find_attached_identity(&record.ip, &record.name).await?;
        if identity.is_none() {
            debug!(agent_id = %id, agent = %record.key(), "agent not attached");
        }
        Ok(identity)
    }

    // ── Capacity ────────────────────────────────────────────────────────

    /// Agents `user_id` may drive, keyed by region. Only the
    /// [`NONE_REGION`] entry is produced.
    pub fn available_agent_count(
        &self,
        user_id: &str,
    ) -> Result<HashMap<String, usize>, ServiceError> {
        let active = self.list_active_agents()?;
        let capacity = AgentCapacity::count(&active, user_id, self.max_shared_agents);
        debug!(
            user_id,
            owned = capacity.owned,
            shared = capacity.shared,
            max_shared = capacity.max_shared,
            "counted available agents"
        );
        Ok(HashMap::from([(NONE_REGION.to_string(), capacity.available())]))
    }
}

/// A command that raced a detach was simply not delivered.
fn deliver(result: Result<(), AdapterError>, identity: &AgentIdentity) -> Result<bool, ServiceError> {
    match result {
        Ok(()) => Ok(true),
        Err(AdapterError::NotAttached(_)) => {
            debug!(agent = %identity.key(), "agent detached before command");
            Ok(false)
        }
        Err(e) => Err(ServiceError::Transport(e)),
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
