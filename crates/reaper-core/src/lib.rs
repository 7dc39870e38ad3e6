pub mod config;
pub mod error;

pub use config::{
    relative_path, ArkConfig, Config, MonitoringConfig, NotificationConfig, ValidationResult,
    WeatherConfig, WeatherEndpoints,
};
pub use error::{
    AppError, ConfigError, GameError, NetworkError, ReqwestErrorExt, WeatherError,
};

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "app";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 7;

/// Keeps the background log writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize logging: console plus a daily rolling file under `config.log_dir()`.
///
/// File logging is best effort; if the directory can't be created the app
/// keeps running with console output only.
pub fn init(config: &Config) -> Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = config.log_dir();
    let (file_layer, guard, file_error) = match file_writer(&log_dir) {
        Ok((writer, guard)) => (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
            None,
        ),
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match file_error {
        Some(e) => tracing::warn!("File logging disabled: {:#}", e),
        None => tracing::debug!("Logging to {}", log_dir.display()),
    }

    tracing::info!("Reaper core initialized");
    Ok(LogGuard { _file: guard })
}

fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir).context("Failed to create log directory")?;

    let appender = RollingBuilder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .context("Failed to create rolling log file")?;

    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_writer_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");
        let (_writer, _guard) = file_writer(&logs).unwrap();
        assert!(logs.is_dir());
    }
}
