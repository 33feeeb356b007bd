// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted agent record.
//!
//! One row per agent the controller has ever seen, keyed durably by
//! [`AgentId`] and naturally by [`AgentKey`]. Rows are never deleted by
//! reconciliation; an agent that detaches is marked inactive instead.

use crate::agent::{normalize_version, AgentKey, AgentState, LiveAgent, LiveHandle};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Durable identifier assigned by the store on first save.
    pub struct AgentId("agt-");
}

/// A persisted agent row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Assigned by the store; `None` until the record is first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AgentId>,
    pub ip: String,
    pub name: String,
    /// Composite region string; `None` means the shared pool's default region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Last-known control channel port
    pub port: u16,
    /// Last-known reported version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub state: AgentState,
    /// `None` only before the default approval policy has been applied
    #[serde(default)]
    pub approved: Option<bool>,
    /// Live connection, present only while attached. Never persisted.
    #[serde(skip)]
    pub identity: LiveHandle,
}

impl AgentRecord {
    /// Seed a new, unsaved record from a live agent. Approval is left unset.
    pub fn from_live(live: &LiveAgent) -> Self {
        let mut record = Self {
            id: None,
            ip: live.identity.ip.clone(),
            name: live.identity.name.clone(),
            region: None,
            port: 0,
            version: None,
            state: AgentState::Unknown,
            approved: None,
            identity: LiveHandle::default(),
        };
        record.apply_live(live);
        record
    }

    pub fn key(&self) -> AgentKey {
        AgentKey::new(self.ip.clone(), self.name.clone())
    }

    pub fn is_approved(&self) -> bool {
        self.approved.unwrap_or(false)
    }

    /// True when port, state, region and version all equal the live values.
    pub fn matches_live(&self, live: &LiveAgent) -> bool {
        self.port == live.port
            && self.state == live.state
            && self.region.as_deref() == live.region()
            && normalize_version(self.version.as_deref())
                == normalize_version(live.version.as_deref())
    }

    /// Copy live attributes onto this record and attach the live handle.
    pub fn apply_live(&mut self, live: &LiveAgent) {
        self.state = live.state;
        self.region = live.identity.region.clone();
        self.port = live.port;
        self.version = live.version.clone();
        self.identity = LiveHandle::new(&live.identity);
    }

    /// Force the record into the inactive state and drop any live handle.
    ///
    /// Returns true if the state actually changed.
    pub fn mark_inactive(&mut self) -> bool {
        self.identity = LiveHandle::default();
        if self.state == AgentState::Inactive {
            return false;
        }
        self.state = AgentState::Inactive;
        true
    }

    /// Apply the default approval policy if approval has never been decided.
    pub fn fill_approval(&mut self, default_approval: bool) {
        if self.approved.is_none() {
            self.approved = Some(default_approval);
        }
    }
}

crate::builder! {
    pub struct AgentRecordBuilder => AgentRecord {
        into {
            ip: String = "10.0.0.1",
            name: String = "agent",
        }
        set {
            port: u16 = 12000,
            state: AgentState = AgentState::Ready,
        }
        option {
            id: AgentId = None,
            region: String = None,
            version: String = Some("3.5.0".to_string()),
            approved: bool = Some(true),
        }
        computed {
            identity: LiveHandle = LiveHandle::default(),
        }
    }
}

#[cfg(test)]
#[path = "agent_record_tests.rs"]
mod tests;
