//! Logging infrastructure for shardman.
//!
//! Structured logging via the `tracing` ecosystem. The console never gets
//! chatty output while the dashboard owns the terminal, so the primary sink
//! is a JSON-lines file under `~/.shardman/logs/`; a compact stderr layer
//! exists for the one-shot CLI subcommands and for `-v` debugging.
//!
//! ## Example
//!
//! ```no_run
//! use shardman_core::logging;
//!
//! // Initialize logging (call once at startup)
//! let _guard = logging::init_logging(None, false).expect("logging init");
//!
//! tracing::info!("shardman started");
//! tracing::debug!(shard = "Master", "polling status");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{Result, ShardmanError};

/// Guard that must be held to ensure log flushing on shutdown.
///
/// When this guard is dropped, it flushes any pending log entries.
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the shardman logging system.
///
/// Sets up file logging (JSON lines, daily rolling) plus a compact stderr
/// layer. Returns a [`LogGuard`] that must be held for the application
/// lifetime so logs are flushed on shutdown.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.shardman/logs/`
/// * `verbose` - If true, sets the default log level to DEBUG instead of INFO.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| ShardmanError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "shardman.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shardman={default_level}")));

    // JSON layer for file output
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true);

    // Human-readable layer for console output
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
///
/// Simpler alternative to [`init_logging`] that only logs to the test
/// writer. Safe to call more than once.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Get the default log directory path (`~/.shardman/logs/`).
pub fn default_log_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| ShardmanError::Internal {
        message: "HOME environment variable not set".into(),
    })?;

    Ok(PathBuf::from(home).join(".shardman").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir_under_home() {
        if std::env::var("HOME").is_err() {
            return;
        }
        let dir = default_log_dir().unwrap();
        assert!(dir.ends_with(".shardman/logs"));
    }

    #[test]
    fn test_init_test_logging() {
        // Should not panic even when called twice
        init_test_logging();
        init_test_logging();
    }
}
