//! Logging utilities for the booking link service.
//!
//! Every crate logs through the `tracing` macros; the binary calls [`init`]
//! once at startup to install the subscriber described by [`LoggingConfig`].

use std::path::Path;

use bookinglink_config::LoggingConfig;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, EnvFilter, Layer};

use crate::error::{internal_error, BookingLinkError, Context};

const DEFAULT_LOG_FILE_NAME: &str = "bookinglink.log";

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. With `config.file` the
/// output goes to a daily rolling file through a non-blocking writer; the
/// returned guard must be kept alive until shutdown so buffered lines are
/// flushed. `config.format = "json"` switches to JSON lines.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, BookingLinkError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| internal_error(format!("invalid log level '{}': {}", config.level, e)))?;

    let (writer, guard) = match config.file.as_deref().filter(|f| !f.is_empty()) {
        Some(log_file) => {
            let appender = rolling_appender(Path::new(log_file))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(guard.is_none());
    let layer = if config.format.eq_ignore_ascii_case("json") {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    let result = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!(level = %config.level, format = %config.format, "Logging initialized");
    }

    Ok(guard)
}

fn rolling_appender(log_file: &Path) -> Result<RollingFileAppender, BookingLinkError> {
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_file
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(DEFAULT_LOG_FILE_NAME);

    std::fs::create_dir_all(dir).context("creating log directory")?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name.trim_end_matches(".log"))
        .filename_suffix("log")
        .build(dir)
        .map_err(|e| internal_error(format!("creating rolling log appender: {}", e)))
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    tracing::error!("{}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_reported() {
        // Only meaningful when RUST_LOG is not set for the test run.
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "bookinglink=notalevel".to_string(),
            ..LoggingConfig::default()
        };
        assert!(init(&config).is_err());
    }

    #[test]
    fn test_rolling_appender_creates_directory() {
        let dir = std::env::temp_dir().join(format!("bookinglink-logs-{}", std::process::id()));
        let file = dir.join("service.log");
        assert!(rolling_appender(&file).is_ok());
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir).ok();
    }
}
