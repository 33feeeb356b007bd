// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composite region strings.
//!
//! Agents report a region of the form `<region>[_]owned_<userId>`. The part
//! before the ownership marker is the base region; the suffix reserves the
//! agent for one user. A region without a marker belongs to the shared pool.

/// Sentinel base region for agents that report none.
pub const NONE_REGION: &str = "NONE";

const OWNED_MARKER: &str = "owned_";
const OWNED_SEPARATED_MARKER: &str = "_owned_";

/// Strip the ownership suffix from a composite region string.
///
/// The `_owned_` marker is tried before the bare `owned_` marker so that
/// `"US_owned_alice"` resolves to `"US"` and not `"US_"`.
pub fn base_region(region: Option<&str>) -> &str {
    let Some(region) = region else {
        return NONE_REGION;
    };
    if let Some(idx) = region.find(OWNED_SEPARATED_MARKER) {
        return &region[..idx];
    }
    if let Some(idx) = region.find(OWNED_MARKER) {
        return &region[..idx];
    }
    if region.is_empty() {
        return NONE_REGION;
    }
    region
}

/// True if the region carries any ownership marker (case-insensitive).
pub fn is_owned(region: Option<&str>) -> bool {
    region.is_some_and(|r| r.to_lowercase().contains(OWNED_MARKER))
}

/// True if the region ends with `owned_<user_id>` (case-insensitive).
pub fn is_owned_by(region: Option<&str>, user_id: &str) -> bool {
    let suffix = format!("{OWNED_MARKER}{user_id}").to_lowercase();
    region.is_some_and(|r| r.to_lowercase().ends_with(&suffix))
}

#[cfg(test)]
#[path = "region_tests.rs"]
mod tests;
