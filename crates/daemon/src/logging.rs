// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon log file setup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::lifecycle::{Config, LifecycleError};

/// Install the global subscriber, writing to `config.log_path`.
///
/// The returned guard flushes buffered lines when dropped; hold it for the
/// life of the process.
pub fn init_logging(config: &Config) -> Result<WorkerGuard, LifecycleError> {
    let dir = config.log_path.parent().unwrap_or(config.state_dir.as_path());
    std::fs::create_dir_all(dir)?;
    let file_name = config.log_path.file_name().ok_or_else(|| {
        LifecycleError::Logging(format!("bad log path {}", config.log_path.display()))
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(crate::env::log_filter())
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
