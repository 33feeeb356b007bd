// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use fleet_adapters::AdapterError;
use fleet_storage::StoreError;
use thiserror::Error;

/// A reconciliation pass that did not complete.
///
/// Either way nothing was written and the cache was left as it was; the
/// next pass starts over from a fresh snapshot.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("live snapshot unavailable: {0}")]
    SourceUnavailable(#[from] AdapterError),
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by administrative operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
    #[error("live snapshot unavailable: {0}")]
    SourceUnavailable(AdapterError),
    #[error("command not delivered: {0}")]
    Transport(AdapterError),
}
