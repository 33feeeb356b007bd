// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable agent registry for the fleet controller

mod file_store;
mod snapshot;
mod store;

pub use file_store::FileAgentStore;
pub use snapshot::{backup_snapshot, load_snapshot, write_snapshot, Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use store::{AgentFilter, AgentStore, StoreError};
