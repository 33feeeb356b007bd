// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process stand-in for the control channel.

use std::sync::Arc;

use async_trait::async_trait;
use fleet_core::{AgentIdentity, AgentKey, AgentState};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::controller::{AdapterError, AgentTransport, AttachedAgents};

/// Recorded transport command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Stop { key: AgentKey },
    Update { key: AgentKey, version: String },
}

struct FakeAgent {
    identity: Arc<AgentIdentity>,
    state: AgentState,
    port: u16,
    version: Option<String>,
}

#[derive(Default)]
struct FakeState {
    agents: Vec<FakeAgent>,
    fail_snapshots: bool,
    fail_sends: bool,
    calls: Vec<TransportCall>,
}

/// Fake attached-agent registry and transport for testing.
///
/// Owns the `Arc<AgentIdentity>` of every attached agent, so detaching an
/// agent invalidates any live handle pointing at it.
#[derive(Clone)]
pub struct FakeController {
    inner: Arc<Mutex<FakeState>>,
    paused: Arc<watch::Sender<bool>>,
}

impl Default for FakeController {
    fn default() -> Self {
        let (paused, _) = watch::channel(false);
        Self { inner: Arc::new(Mutex::new(FakeState::default())), paused: Arc::new(paused) }
    }
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a ready agent on port 12000 reporting version 3.5.0.
    pub fn attach(&self, ip: &str, name: &str, region: Option<&str>) -> Arc<AgentIdentity> {
        let identity = Arc::new(AgentIdentity::new(ip, name, region.map(str::to_string)));
        self.inner.lock().agents.push(FakeAgent {
            identity: Arc::clone(&identity),
            state: AgentState::Ready,
            port: 12000,
            version: Some("3.5.0".to_string()),
        });
        identity
    }

    /// Drop every connection for the key.
    pub fn detach(&self, ip: &str, name: &str) {
        let key = AgentKey::new(ip, name);
        self.inner.lock().agents.retain(|a| a.identity.key() != key);
    }

    pub fn set_state(&self, ip: &str, name: &str, state: AgentState) {
        self.update(ip, name, |a| a.state = state);
    }

    pub fn set_port(&self, ip: &str, name: &str, port: u16) {
        self.update(ip, name, |a| a.port = port);
    }

    pub fn set_version(&self, ip: &str, name: &str, version: Option<&str>) {
        self.update(ip, name, |a| a.version = version.map(str::to_string));
    }

    /// Make `attached()` fail until cleared.
    pub fn fail_snapshots(&self, fail: bool) {
        self.inner.lock().fail_snapshots = fail;
    }

    /// Make stop/update commands fail until cleared.
    pub fn fail_sends(&self, fail: bool) {
        self.inner.lock().fail_sends = fail;
    }

    /// Block `attached()` callers until [`FakeController::resume_snapshots`].
    pub fn pause_snapshots(&self) {
        self.paused.send_replace(true);
    }

    pub fn resume_snapshots(&self) {
        self.paused.send_replace(false);
    }

    /// Get all recorded transport commands
    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }

    pub fn attached_count(&self) -> usize {
        self.inner.lock().agents.len()
    }

    fn update(&self, ip: &str, name: &str, f: impl Fn(&mut FakeAgent)) {
        let key = AgentKey::new(ip, name);
        for agent in self.inner.lock().agents.iter_mut().filter(|a| a.identity.key() == key) {
            f(agent);
        }
    }

    fn with_agent<R>(
        &self,
        identity: &AgentIdentity,
        f: impl FnOnce(&FakeAgent) -> R,
    ) -> Result<R, AdapterError> {
        let state = self.inner.lock();
        state
            .agents
            .iter()
            .find(|a| a.identity.connection == identity.connection)
            .map(f)
            .ok_or_else(|| AdapterError::NotAttached(identity.key().to_string()))
    }

    fn record(&self, identity: &AgentIdentity, call: TransportCall) -> Result<(), AdapterError> {
        self.with_agent(identity, |_| ())?;
        let mut state = self.inner.lock();
        if state.fail_sends {
            return Err(AdapterError::SendFailed("sends disabled".to_string()));
        }
        state.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl AttachedAgents for FakeController {
    async fn attached(&self) -> Result<Vec<Arc<AgentIdentity>>, AdapterError> {
        let mut paused = self.paused.subscribe();
        let _ = paused.wait_for(|p| !*p).await;

        let state = self.inner.lock();
        if state.fail_snapshots {
            return Err(AdapterError::Unavailable("snapshots disabled".to_string()));
        }
        Ok(state.agents.iter().map(|a| Arc::clone(&a.identity)).collect())
    }
}

#[async_trait]
impl AgentTransport for FakeController {
    async fn query_state(&self, identity: &AgentIdentity) -> Result<AgentState, AdapterError> {
        self.with_agent(identity, |a| a.state)
    }

    async fn query_connecting_port(&self, identity: &AgentIdentity) -> Result<u16, AdapterError> {
        self.with_agent(identity, |a| a.port)
    }

    async fn query_reported_version(
        &self,
        identity: &AgentIdentity,
    ) -> Result<Option<String>, AdapterError> {
        self.with_agent(identity, |a| a.version.clone())
    }

    async fn stop_agent(&self, identity: &AgentIdentity) -> Result<(), AdapterError> {
        self.record(identity, TransportCall::Stop { key: identity.key() })
    }

    async fn push_update(
        &self,
        identity: &AgentIdentity,
        target_version: &str,
    ) -> Result<(), AdapterError> {
        self.record(
            identity,
            TransportCall::Update { key: identity.key(), version: target_version.to_string() },
        )
    }
}
