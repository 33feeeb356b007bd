// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

const VARS: &[&str] = &[
    "FLEET_STATE_DIR",
    "XDG_STATE_HOME",
    "FLEET_LOG",
    "RUST_LOG",
    "FLEET_AUTO_APPROVE",
    "FLEET_MAX_SHARED_AGENTS",
    "FLEET_RECONCILE_INTERVAL_MS",
];

fn clear() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn state_dir_prefers_explicit_override() {
    clear();
    std::env::set_var("FLEET_STATE_DIR", "/tmp/fleet-explicit");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/fleet-explicit"));
    clear();
}

#[test]
#[serial]
fn state_dir_falls_back_to_xdg() {
    clear();
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/fleet"));
    clear();
}

#[test]
#[serial]
fn log_filter_precedence() {
    clear();
    assert_eq!(log_filter(), DEFAULT_LOG_FILTER);

    std::env::set_var("RUST_LOG", "warn");
    assert_eq!(log_filter(), "warn");

    std::env::set_var("FLEET_LOG", "fleet_engine=debug");
    assert_eq!(log_filter(), "fleet_engine=debug");
    clear();
}

#[yare::parameterized(
    one   = { "1", Some(true) },
    yes   = { "YES", Some(true) },
    true_ = { " true ", Some(true) },
    zero  = { "0", Some(false) },
    off   = { "off", Some(false) },
    junk  = { "maybe", None },
)]
fn flags_parse(value: &str, expected: Option<bool>) {
    assert_eq!(parse_flag(value), expected);
}

#[test]
#[serial]
fn overrides_replace_loaded_values() {
    clear();
    std::env::set_var("FLEET_AUTO_APPROVE", "true");
    std::env::set_var("FLEET_MAX_SHARED_AGENTS", "4");
    std::env::set_var("FLEET_RECONCILE_INTERVAL_MS", "250");

    let config = apply_overrides(ControllerConfig::default());
    assert!(config.auto_approve);
    assert_eq!(config.max_shared_agents_per_console, 4);
    assert_eq!(config.reconcile_interval_ms, 250);
    clear();
}

#[test]
#[serial]
fn invalid_overrides_are_ignored() {
    clear();
    std::env::set_var("FLEET_MAX_SHARED_AGENTS", "many");
    std::env::set_var("FLEET_RECONCILE_INTERVAL_MS", "0");

    let config = apply_overrides(ControllerConfig::default());
    assert_eq!(config, ControllerConfig::default());
    clear();
}
