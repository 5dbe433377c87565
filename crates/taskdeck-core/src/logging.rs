//! Tracing setup.
//!
//! Logs go to a daily-rolling file under `${TASKDECK_HOME}/logs` so stdout
//! stays reserved for command output. `RUST_LOG` overrides the configured
//! filter.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

const LOG_FILE_PREFIX: &str = "taskdeck.log";

/// Keeps the background log writer alive; drop it last.
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Installs the global subscriber writing to the default log directory.
pub fn init(config: &Config) -> Result<LogGuard> {
    init_in(&paths::logs_dir(), &config.log_level)
}

/// Installs the global subscriber writing to `dir`.
///
/// Fails if a global subscriber is already set.
pub fn init_in(dir: &Path, default_filter: &str) -> Result<LogGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("Invalid log filter: {default_filter}"))?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(LogGuard { _worker: worker })
}
