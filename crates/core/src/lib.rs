// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-core: shared types for the agent fleet controller

pub mod macros;

pub mod agent;
pub mod agent_record;
pub mod capacity;
pub mod clock;
pub mod config;
pub mod id;
pub mod region;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use agent::{normalize_version, AgentIdentity, AgentKey, AgentState, ConnectionId, LiveAgent, LiveHandle};
#[cfg(any(test, feature = "test-support"))]
pub use agent_record::AgentRecordBuilder;
pub use agent_record::{AgentId, AgentRecord};
pub use capacity::AgentCapacity;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, ControllerConfig};
pub use region::{base_region, is_owned, is_owned_by, NONE_REGION};
