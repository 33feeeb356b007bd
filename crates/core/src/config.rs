// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller settings that shape reconciliation and capacity.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading controller configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("invalid config in {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Controller settings, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Approval given to agents the first time they are seen
    pub auto_approve: bool,
    /// Most shared-pool agents one user may use at once
    pub max_shared_agents_per_console: usize,
    /// Version pushed to agents on a forced update
    pub controller_version: String,
    /// Reconciliation period, also the cache staleness bound
    pub reconcile_interval_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            auto_approve: false,
            max_shared_agents_per_console: 10,
            controller_version: env!("CARGO_PKG_VERSION").to_string(),
            reconcile_interval_ms: 1000,
        }
    }
}

impl ControllerConfig {
    crate::setters! {
        into { controller_version: String }
        set {
            auto_approve: bool,
            max_shared_agents_per_console: usize,
            reconcile_interval_ms: u64,
        }
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Read(path.to_path_buf(), e)),
        };
        let config: Self =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconcile_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "reconcile_interval_ms",
                value: self.reconcile_interval_ms.to_string(),
            });
        }
        Ok(())
    }

    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_millis(self.reconcile_interval_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
