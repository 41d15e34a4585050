//! Error types for shardman operations.
//!
//! This module defines [`ShardmanError`], the error enum shared by every
//! crate in the workspace. Errors carry enough context to print an
//! actionable message; adapter-level degradation (a missing systemctl, an
//! absent chat log) is deliberately *not* an error, it shows up as empty
//! data instead so the dashboard stays available.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ShardmanError`].
pub type Result<T> = std::result::Result<T, ShardmanError>;

/// Error type for all shardman operations.
#[derive(Debug, Error)]
pub enum ShardmanError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file could not be read
    #[error("Failed to read configuration at {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration is present but unusable
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Supervisor Errors
    // =========================================================================
    /// The external updater script is missing
    #[error("Updater script not found at {path}")]
    UpdaterNotFound { path: PathBuf },

    // =========================================================================
    // Chat Errors
    // =========================================================================
    /// Console FIFO for a shard does not exist
    #[error("Console FIFO for shard '{shard}' not found at {path}")]
    FifoNotFound { shard: String, path: PathBuf },

    /// Chat transport refused or failed to deliver a message
    #[error("Chat transport error: {message}")]
    ChatTransport { message: String },

    // =========================================================================
    // TUI Errors
    // =========================================================================
    /// Terminal initialization failed
    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in shardman)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ShardmanError {
    /// Create an I/O error.
    pub fn io(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a ConfigInvalid error.
    pub fn config_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a chat transport error.
    pub fn chat_transport(message: impl Into<String>) -> Self {
        Self::ChatTransport {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. } | Self::ConfigInvalid { .. }
        )
    }

    /// Returns actionable guidance for the user.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigRead { .. } | Self::ConfigInvalid { .. } => {
                Some("Check ~/.config/dontstarve/config and shards.conf")
            }
            Self::UpdaterNotFound { .. } => {
                Some("Install the updater script or set UPDATER_PATH in the config")
            }
            Self::FifoNotFound { .. } => {
                Some("The console FIFO appears once the shard is running")
            }
            Self::TerminalInit { .. } => Some("Try running in a different terminal"),
            _ => None,
        }
    }
}
