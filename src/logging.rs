//! Logging initialization for qase-bulk.
//!
//! Logs go to stderr so they never mix with command output on stdout.
//! With `logging.to_file` set they go to `<directory>/qase-bulk-{datetime}.log`
//! instead.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Result of logging initialization
pub struct LoggingHandle {
    /// Flushes buffered file output when dropped; keep it alive until exit
    pub _guard: Option<WorkerGuard>,

    /// Session log file, when file logging is on
    pub log_file_path: Option<PathBuf>,
}

/// Destination for formatted log lines
struct LogSink {
    writer: BoxMakeWriter,
    guard: Option<WorkerGuard>,
    path: Option<PathBuf>,
}

/// Effective filter directive: `--debug` beats the configured level
fn log_level(config: &Config, debug_override: bool) -> String {
    if debug_override {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    }
}

/// Log file name for a session started now
fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("qase-bulk-{}.log", timestamp)
}

/// Stderr, or a fresh session file under the logs directory
fn log_sink(config: &Config) -> Result<LogSink> {
    if !config.logging.to_file {
        return Ok(LogSink {
            writer: BoxMakeWriter::new(std::io::stderr),
            guard: None,
            path: None,
        });
    }

    let logs_dir = config.logs_path();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let file_name = log_file_name();
    let appender = tracing_appender::rolling::never(&logs_dir, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    Ok(LogSink {
        writer: BoxMakeWriter::new(writer),
        guard: Some(guard),
        path: Some(logs_dir.join(file_name)),
    })
}

/// Initialize logging from configuration.
///
/// `RUST_LOG` takes precedence over both the configured level and
/// `debug_override`.
pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| log_level(config, debug_override)),
    );
    let sink = log_sink(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(sink.path.is_none())
                .with_writer(sink.writer),
        )
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(LoggingHandle {
        _guard: sink.guard,
        log_file_path: sink.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_override_wins() {
        let config = Config::default();
        assert_eq!(log_level(&config, true), "debug");
        assert_eq!(log_level(&config, false), "warn");
    }

    #[test]
    fn test_configured_level_used() {
        let mut config = Config::default();
        config.logging.level = "qase_bulk=trace".to_string();
        assert_eq!(log_level(&config, false), "qase_bulk=trace");
    }

    #[test]
    fn test_log_file_name_format() {
        let name = log_file_name();
        assert!(name.starts_with("qase-bulk-"));
        assert!(name.ends_with("Z.log"));
    }

    #[test]
    fn test_stderr_sink_has_no_file() {
        let sink = log_sink(&Config::default()).unwrap();
        assert!(sink.guard.is_none());
        assert!(sink.path.is_none());
    }

    #[test]
    fn test_file_sink_creates_log_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let logs_dir = temp_dir.path().join("nested").join("logs");

        let mut config = Config::default();
        config.logging.to_file = true;
        config.logging.directory = logs_dir.to_string_lossy().into_owned();

        let sink = log_sink(&config).unwrap();
        assert!(logs_dir.is_dir());
        assert!(sink.guard.is_some());

        let path = sink.path.unwrap();
        assert_eq!(path.parent(), Some(logs_dir.as_path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("qase-bulk-"));
    }
}
