// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-engine: reconciles attached agents against the persisted fleet
//! and serves the administrative operations on top of it.

mod approval;
mod cache;
mod diff;
mod error;
mod manager;
mod reconcile;

#[cfg(test)]
mod test_helpers;

pub use approval::ApprovalGate;
pub use cache::AgentCache;
pub use diff::{compute_diff, AgentDiff};
pub use error::{ReconcileError, ServiceError};
pub use manager::{AgentManager, ManagerDeps};
pub use reconcile::ReconcileSummary;
