// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent identity, live connection handles, and connection state.
//!
//! Two views of an agent meet here: the transient [`AgentIdentity`] owned
//! by the controller while a control connection is open, and the durable
//! [`crate::AgentRecord`]. [`AgentKey`] is the join key between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};

crate::define_id! {
    /// Process-local identifier for one control connection.
    ///
    /// A reconnecting agent gets a new connection ID but keeps its
    /// [`AgentKey`].
    pub struct ConnectionId("con-");
}

/// Natural key of an agent: the `(ip, name)` pair it reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentKey {
    pub ip: String,
    pub name: String,
}

impl AgentKey {
    pub fn new(ip: impl Into<String>, name: impl Into<String>) -> Self {
        Self { ip: ip.into(), name: name.into() }
    }
}

impl fmt::Display for AgentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.ip, self.name)
    }
}

/// Connection-scoped identity of an attached agent.
///
/// Owned by the attached-agent registry as `Arc<AgentIdentity>` for as long
/// as the control connection stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub connection: ConnectionId,
    pub ip: String,
    pub name: String,
    /// Composite region string as reported by the agent (see [`crate::region`])
    pub region: Option<String>,
}

impl AgentIdentity {
    pub fn new(ip: impl Into<String>, name: impl Into<String>, region: Option<String>) -> Self {
        Self { connection: ConnectionId::generate(), ip: ip.into(), name: name.into(), region }
    }

    pub fn key(&self) -> AgentKey {
        AgentKey::new(self.ip.clone(), self.name.clone())
    }
}

/// Non-owning back-reference from a record to its live connection.
///
/// Upgrades only while the registry still holds the connection; a default
/// handle never upgrades.
#[derive(Debug, Clone, Default)]
pub struct LiveHandle(Weak<AgentIdentity>);

impl LiveHandle {
    pub fn new(identity: &Arc<AgentIdentity>) -> Self {
        Self(Arc::downgrade(identity))
    }

    pub fn upgrade(&self) -> Option<Arc<AgentIdentity>> {
        self.0.upgrade()
    }

    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }
}

/// Connection state of an agent.
///
/// Consumers should only ask [`AgentState::is_active`] and
/// [`AgentState::is_visible`]; the variant set follows the agent protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Attached but has not reported a state yet
    Unknown,
    /// Not attached to this controller
    Inactive,
    /// Agent process is starting up
    Started,
    /// Idle and able to take a test
    Ready,
    /// Running a test
    Busy,
    /// Installing a pushed version
    Updating,
    /// Agent process has finished and is about to detach
    Finished,
    /// Attached with a region this controller does not serve
    WrongRegion,
}

impl AgentState {
    /// Counts toward capacity.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Started | Self::Ready | Self::Busy | Self::Updating)
    }

    /// Shown in agent listings.
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

crate::simple_display! {
    AgentState {
        Unknown => "unknown",
        Inactive => "inactive",
        Started => "started",
        Ready => "ready",
        Busy => "busy",
        Updating => "updating",
        Finished => "finished",
        WrongRegion => "wrong_region",
    }
}

/// One entry of the live snapshot: an attached identity plus the
/// attributes the transport reported for it during this pass.
#[derive(Debug, Clone)]
pub struct LiveAgent {
    pub identity: Arc<AgentIdentity>,
    pub port: u16,
    pub state: AgentState,
    pub version: Option<String>,
}

impl LiveAgent {
    pub fn key(&self) -> AgentKey {
        self.identity.key()
    }

    pub fn region(&self) -> Option<&str> {
        self.identity.region.as_deref()
    }
}

/// Trim a reported version, treating blank as absent.
pub fn normalize_version(version: Option<&str>) -> Option<&str> {
    version.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
