//! Logging setup.
//!
//! The looper owns the terminal, so log output goes to a file:
//! `<state_dir>/ytloop/ytloop.log` (falling back to the data directory on
//! platforms without a state directory). `YTLOOP_LOG` takes a filter
//! directive such as `ytloop=debug`; without it the level is `warn`, or
//! `debug` with `--verbose`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "YTLOOP_LOG";

/// Default directive when `YTLOOP_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "ytloop=debug"
    } else {
        "warn"
    }
}

/// Where the log file is written.
pub fn log_path() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .context("Could not determine a directory for the log file")?;
    Ok(base.join("ytloop").join("ytloop.log"))
}

/// Build the filter from `YTLOOP_LOG`, falling back to the default level.
pub fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber writing to the log file.
///
/// Returns the log file path.
pub fn init(verbose: bool) -> Result<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(file_layer)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(path)
}
