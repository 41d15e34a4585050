//! Outbound chat delivery via the shard console FIFO.

use std::io::Write;
use std::path::{Path, PathBuf};

use shardman_core::{Result, ShardmanError, MASTER_SHARD};
use tracing::{debug, instrument};

/// Capability interface for sending chat into the game.
///
/// Wired bridges implement this; a missing bridge is a plain `Option::None`
/// at the call site, never a runtime capability probe.
pub trait ChatTransport {
    /// Deliver a chat message to the named shard.
    fn send(&self, shard: &str, text: &str) -> Result<()>;
}

/// Sends console commands through the per-shard FIFO that the unit files
/// expose under `~/.cache/dontstarve/`.
///
/// Only the Master shard owns a cluster-wide console; messages to any other
/// shard are refused up front.
#[derive(Debug, Clone)]
pub struct ConsoleFifoTransport {
    fifo_dir: PathBuf,
}

impl ConsoleFifoTransport {
    /// Create a transport rooted at the default FIFO directory.
    pub fn new() -> Result<Self> {
        let cache = dirs::cache_dir()
            .ok_or_else(|| ShardmanError::internal("could not determine the cache directory"))?;
        Ok(Self {
            fifo_dir: cache.join("dontstarve"),
        })
    }

    /// Create a transport rooted at an explicit FIFO directory.
    pub fn with_fifo_dir(fifo_dir: impl Into<PathBuf>) -> Self {
        Self {
            fifo_dir: fifo_dir.into(),
        }
    }

    fn fifo_path(&self, shard: &str) -> PathBuf {
        self.fifo_dir.join(format!("dst-{shard}.fifo"))
    }

    /// Write a raw console command to the shard's FIFO.
    #[instrument(level = "debug", skip_all, fields(shard = %shard))]
    pub fn send_command(&self, shard: &str, command: &str) -> Result<()> {
        if shard != MASTER_SHARD {
            return Err(ShardmanError::chat_transport(format!(
                "console commands can only be sent to the '{MASTER_SHARD}' shard, not '{shard}'"
            )));
        }

        let path = self.fifo_path(shard);
        if !path.exists() {
            return Err(ShardmanError::FifoNotFound {
                shard: shard.to_string(),
                path,
            });
        }

        let mut fifo = std::fs::OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|e| ShardmanError::io("opening console FIFO", &path, e))?;
        writeln!(fifo, "{command}").map_err(|e| ShardmanError::io("writing console FIFO", &path, e))?;

        debug!(path = %path.display(), "console command sent");
        Ok(())
    }
}

impl ChatTransport for ConsoleFifoTransport {
    fn send(&self, shard: &str, text: &str) -> Result<()> {
        self.send_command(shard, &announce_command(text))
    }
}

/// Wrap a chat message in the game's announce console call, escaping quotes
/// and backslashes so the message cannot break out of the string literal.
fn announce_command(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("c_announce(\"{escaped}\")")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_with_fifo(dir: &Path, shard: &str) -> ConsoleFifoTransport {
        // A regular file stands in for the FIFO; the write path is the same.
        std::fs::write(dir.join(format!("dst-{shard}.fifo")), "").unwrap();
        ConsoleFifoTransport::with_fifo_dir(dir)
    }

    #[test]
    fn test_announce_command_escapes_quotes() {
        assert_eq!(announce_command("hello"), "c_announce(\"hello\")");
        assert_eq!(
            announce_command("say \"hi\""),
            "c_announce(\"say \\\"hi\\\"\")"
        );
        assert_eq!(announce_command("a\\b"), "c_announce(\"a\\\\b\")");
    }

    #[test]
    fn test_send_writes_announce_to_fifo() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport_with_fifo(dir.path(), "Master");

        transport.send("Master", "server restarting soon").unwrap();

        let written = std::fs::read_to_string(dir.path().join("dst-Master.fifo")).unwrap();
        assert_eq!(written, "c_announce(\"server restarting soon\")\n");
    }

    #[test]
    fn test_send_refuses_non_master_shard() {
        let dir = tempfile::tempdir().unwrap();
        let transport = transport_with_fifo(dir.path(), "Caves");

        let err = transport.send("Caves", "hi").unwrap_err();
        assert!(matches!(err, ShardmanError::ChatTransport { .. }));
    }

    #[test]
    fn test_send_missing_fifo() {
        let dir = tempfile::tempdir().unwrap();
        let transport = ConsoleFifoTransport::with_fifo_dir(dir.path());

        let err = transport.send("Master", "hi").unwrap_err();
        assert!(matches!(err, ShardmanError::FifoNotFound { .. }));
    }
}
