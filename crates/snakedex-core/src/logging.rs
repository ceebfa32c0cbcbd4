//! Tracing setup.
//!
//! CLI subcommands log to stderr. The TUI owns the terminal, so it logs to a
//! daily rolling file under `${SNAKEDEX_HOME}/logs` instead.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "SNAKEDEX_LOG";

const LOG_FILE_PREFIX: &str = "snakedex.log";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a compact stderr subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_stderr(default_level: &str) {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(layer)
        .try_init();
}

/// Installs a subscriber writing to a daily rolling file in `dir`.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// lifetime of the UI.
pub fn init_file(dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer().with_ansi(false).with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(layer)
        .try_init()
        .context("Failed to install file logger")?;

    Ok(guard)
}
