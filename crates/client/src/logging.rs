//! Log file setup for the console client.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Route tracing output to `<cache dir>/logs/<run>/client.log`.
///
/// Stdout belongs to the console frontend, so nothing is written to the
/// terminal unless `ARENA_LOG_STDERR` is set. The returned guard flushes the
/// file writer when dropped and must be held for the life of the process.
pub fn setup_logging(run_id: Option<&str>) -> Result<(WorkerGuard, PathBuf)> {
    let run_id = run_id.map(str::to_string).unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("run_{}", timestamp)
    });

    let run_log_dir = log_directory().join(&run_id);
    std::fs::create_dir_all(&run_log_dir)
        .with_context(|| format!("failed to create {}", run_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&run_log_dir, "client.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = std::env::var_os("ARENA_LOG_STDERR")
        .is_some()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!("Logging initialized: run={}", run_id);

    let log_file = run_log_dir.join("client.log");
    tracing::info!("Log file: {}", log_file.display());
    Ok((guard, log_file))
}

/// Platform cache directory, or the system temp directory when none is known.
fn log_directory() -> PathBuf {
    ProjectDirs::from("", "", "arena")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("arena").join("logs"))
}
