// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let config = ControllerConfig::load(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, ControllerConfig::default());
    assert_eq!(config.reconcile_interval(), Duration::from_secs(1));
    assert!(!config.auto_approve);
}

#[test]
fn partial_file_overrides_only_given_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "auto_approve = true\nmax_shared_agents_per_console = 3\n").unwrap();

    let config = ControllerConfig::load(&path).unwrap();
    assert!(config.auto_approve);
    assert_eq!(config.max_shared_agents_per_console, 3);
    assert_eq!(config.reconcile_interval_ms, 1000);
}

#[test]
fn unknown_key_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "auto_aprove = true\n").unwrap();

    let err = ControllerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(..)), "got {err:?}");
}

#[test]
fn zero_interval_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "reconcile_interval_ms = 0\n").unwrap();

    let err = ControllerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key: "reconcile_interval_ms", .. }));
}

#[test]
fn setters_chain() {
    let config = ControllerConfig::default()
        .auto_approve(true)
        .max_shared_agents_per_console(7)
        .controller_version("9.9.9");
    assert!(config.auto_approve);
    assert_eq!(config.max_shared_agents_per_console, 7);
    assert_eq!(config.controller_version, "9.9.9");
}
