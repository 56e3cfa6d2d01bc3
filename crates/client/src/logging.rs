//! Logging to stderr and to a per-session file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Platform cache directory for logs, `/tmp/battlefield/logs` as fallback.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "battlefield")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/battlefield"))
        .join("logs")
}

/// Installs the global subscriber: `RUST_LOG` filter (default `info`), a
/// stderr layer, and a non-blocking file layer writing
/// `<log_dir>/<session>/battlefield.log`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole program.
pub fn setup_logging(log_dir: Option<&Path>, session: &str) -> Result<WorkerGuard> {
    let session_dir = log_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(default_log_dir)
        .join(session);
    std::fs::create_dir_all(&session_dir)
        .with_context(|| format!("Failed to create log directory: {}", session_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_dir, "battlefield.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized: session={}", session);
    tracing::info!("Log file: {}/battlefield.log", session_dir.display());

    Ok(guard)
}
