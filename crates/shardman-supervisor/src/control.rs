//! Per-shard control actions and log retrieval.

use shardman_core::{CommandOutput, ShardAction};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::systemctl::{run_systemctl, unit_name};

/// Issues mutating actions against individual shard units.
///
/// Each [`apply`](ShardController::apply) maps to exactly one systemctl
/// call; there is no batching at this layer. Fan-out over a list is
/// sequential and best-effort.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShardController;

impl ShardController {
    pub fn new() -> Self {
        Self
    }

    /// Apply a single action to a single shard.
    #[instrument(level = "debug", skip_all, fields(shard = %shard, action = %action))]
    pub async fn apply(&self, shard: &str, action: ShardAction) -> CommandOutput {
        let unit = unit_name(shard);
        let output = run_systemctl(&[action.as_str(), &unit]).await;
        if output.success {
            debug!(unit = %unit, "action applied");
        } else {
            warn!(unit = %unit, stderr = %output.stderr, "action failed");
        }
        output
    }

    /// Apply an action to every shard in the list, sequentially.
    ///
    /// A failure on one shard does not abort the rest; the caller gets the
    /// full per-shard result list.
    #[instrument(level = "debug", skip_all, fields(action = %action, count = shards.len()))]
    pub async fn apply_all(
        &self,
        action: ShardAction,
        shards: &[String],
    ) -> Vec<(String, CommandOutput)> {
        let mut results = Vec::with_capacity(shards.len());
        for shard in shards {
            let output = self.apply(shard, action).await;
            results.push((shard.clone(), output));
        }
        results
    }

    /// Fetch the most recent journal lines for a shard.
    ///
    /// Failure never raises: a broken journalctl yields its own stderr (or a
    /// diagnostic) as the returned text, which the log viewer displays as-is.
    #[instrument(level = "debug", skip_all, fields(shard = %shard, lines = max_lines))]
    pub async fn fetch_logs(&self, shard: &str, max_lines: u32) -> String {
        let unit = unit_name(shard);
        let result = Command::new("journalctl")
            .args([
                "--user",
                "-u",
                &unit,
                "-n",
                &max_lines.to_string(),
                "--no-pager",
                "-o",
                "cat",
            ])
            .output()
            .await;

        match result {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                warn!(unit = %unit, stderr = %stderr, "journalctl failed");
                if stderr.is_empty() {
                    format!("No logs available for {unit}")
                } else {
                    stderr
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to invoke journalctl");
                format!("journalctl command not found or not runnable: {e}")
            }
        }
    }
}
