// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{AgentIdentity, AgentState, LiveAgent};
use std::sync::Arc;

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for agent types.
pub mod strategies {
    use crate::AgentState;
    use proptest::prelude::*;

    pub fn arb_agent_state() -> impl Strategy<Value = AgentState> {
        prop_oneof![
            Just(AgentState::Unknown),
            Just(AgentState::Inactive),
            Just(AgentState::Started),
            Just(AgentState::Ready),
            Just(AgentState::Busy),
            Just(AgentState::Updating),
            Just(AgentState::Finished),
            Just(AgentState::WrongRegion),
        ]
    }

    pub fn arb_region() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            "[A-Z]{2}".prop_map(Some),
            ("[A-Z]{2}", "[a-z]{3,6}").prop_map(|(r, u)| Some(format!("{r}_owned_{u}"))),
        ]
    }
}

// ── Live agent factories ────────────────────────────────────────────────

/// A ready live agent with a fresh connection.
pub fn live_agent(ip: &str, name: &str) -> LiveAgent {
    LiveAgent {
        identity: Arc::new(AgentIdentity::new(ip, name, None)),
        port: 12000,
        state: AgentState::Ready,
        version: Some("3.5.0".to_string()),
    }
}

/// A live agent with explicit attributes.
pub fn live_agent_with(
    ip: &str,
    name: &str,
    region: Option<&str>,
    port: u16,
    state: AgentState,
) -> LiveAgent {
    LiveAgent {
        identity: Arc::new(AgentIdentity::new(ip, name, region.map(str::to_string))),
        port,
        state,
        version: Some("3.5.0".to_string()),
    }
}
