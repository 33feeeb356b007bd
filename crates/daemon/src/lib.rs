// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fleet controller daemon
//!
//! Wires the agent store, the reconciliation engine and a periodic
//! scheduler together. The control channel adapters are supplied by the
//! embedding process.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lifecycle;
mod logging;
mod scheduler;

pub use lifecycle::{startup, Config, DaemonManager, DaemonState, LifecycleError};
pub use logging::init_logging;
pub use scheduler::{ReconcileScheduler, SchedulerStats};
