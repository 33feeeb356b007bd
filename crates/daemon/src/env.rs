// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use fleet_core::ControllerConfig;

use crate::lifecycle::LifecycleError;

/// Default log filter when neither `FLEET_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Resolve state directory: FLEET_STATE_DIR > XDG_STATE_HOME/fleet > ~/.local/state/fleet
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("FLEET_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("fleet"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/fleet"))
}

/// Log filter directive: FLEET_LOG > RUST_LOG > "info"
pub fn log_filter() -> String {
    std::env::var("FLEET_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

/// Approve first-seen agents (`FLEET_AUTO_APPROVE`).
pub fn auto_approve() -> Option<bool> {
    std::env::var("FLEET_AUTO_APPROVE").ok().and_then(|s| parse_flag(&s))
}

/// Shared-pool cap per user (`FLEET_MAX_SHARED_AGENTS`).
pub fn max_shared_agents() -> Option<usize> {
    std::env::var("FLEET_MAX_SHARED_AGENTS").ok().and_then(|s| s.parse::<usize>().ok())
}

/// Reconciliation period override (`FLEET_RECONCILE_INTERVAL_MS`). Zero is ignored.
pub fn reconcile_interval_ms() -> Option<u64> {
    std::env::var("FLEET_RECONCILE_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
}

/// Layer environment overrides on top of a loaded config.
pub fn apply_overrides(config: ControllerConfig) -> ControllerConfig {
    let mut config = config;
    if let Some(auto) = auto_approve() {
        config = config.auto_approve(auto);
    }
    if let Some(max) = max_shared_agents() {
        config = config.max_shared_agents_per_console(max);
    }
    if let Some(ms) = reconcile_interval_ms() {
        config = config.reconcile_interval_ms(ms);
    }
    config
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
