// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Attached-agent registry and transport contracts.
//!
//! The control channel itself lives outside this workspace. The engine
//! only needs a point-in-time list of attached identities and a handful of
//! per-identity queries and commands.

use std::sync::Arc;

use async_trait::async_trait;
use fleet_core::{AgentIdentity, AgentState, LiveAgent};
use thiserror::Error;
use tracing::debug;

/// Errors from control channel operations
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("agent registry unavailable: {0}")]
    Unavailable(String),
    #[error("agent not attached: {0}")]
    NotAttached(String),
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Source of the agents currently attached to this controller.
#[async_trait]
pub trait AttachedAgents: Clone + Send + Sync + 'static {
    /// Every identity with an open control connection right now.
    async fn attached(&self) -> Result<Vec<Arc<AgentIdentity>>, AdapterError>;
}

/// Per-agent queries and commands over the control channel.
#[async_trait]
pub trait AgentTransport: Clone + Send + Sync + 'static {
    async fn query_state(&self, identity: &AgentIdentity) -> Result<AgentState, AdapterError>;

    async fn query_connecting_port(&self, identity: &AgentIdentity) -> Result<u16, AdapterError>;

    async fn query_reported_version(
        &self,
        identity: &AgentIdentity,
    ) -> Result<Option<String>, AdapterError>;

    /// Ask the agent to shut down.
    async fn stop_agent(&self, identity: &AgentIdentity) -> Result<(), AdapterError>;

    /// Ask the agent to install `target_version`.
    async fn push_update(
        &self,
        identity: &AgentIdentity,
        target_version: &str,
    ) -> Result<(), AdapterError>;
}

/// Build the live snapshot: every attached identity with its current
/// state, port and version.
///
/// An agent that detaches between listing and querying is left out; it
/// will be seen as gone on this pass and reappear on the next one if it
/// reconnects. Any other failure aborts the whole snapshot.
pub async fn snapshot_live<R, T>(registry: &R, transport: &T) -> Result<Vec<LiveAgent>, AdapterError>
where
    R: AttachedAgents,
    T: AgentTransport,
{
    let identities = registry.attached().await?;
    let mut live = Vec::with_capacity(identities.len());
    for identity in identities {
        match query_live(transport, identity).await {
            Ok(agent) => live.push(agent),
            Err(AdapterError::NotAttached(key)) => {
                debug!(agent = %key, "agent detached while building snapshot");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(live)
}

/// Query one identity's current attributes.
pub async fn query_live<T: AgentTransport>(
    transport: &T,
    identity: Arc<AgentIdentity>,
) -> Result<LiveAgent, AdapterError> {
    let state = transport.query_state(&identity).await?;
    let port = transport.query_connecting_port(&identity).await?;
    let version = transport.query_reported_version(&identity).await?;
    Ok(LiveAgent { identity, port, state, version })
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
