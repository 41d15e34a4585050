//! External updater invocation.

use std::path::{Path, PathBuf};

use shardman_core::{CommandOutput, Result, ShardmanError};
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Runs the external `dst-updater` script that refreshes the game install.
///
/// The updater is a long-running blocking command; callers decide where to
/// run it (the dashboard routes it through its background job slot).
#[derive(Debug, Clone)]
pub struct Updater {
    override_path: Option<PathBuf>,
}

impl Updater {
    /// Create an updater, optionally pinned to an explicit script path.
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self { override_path }
    }

    /// Resolve the updater script path.
    ///
    /// The config override wins; otherwise `~/.local/bin/dst-updater`.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.override_path {
            return check_exists(path);
        }
        let home = dirs::home_dir()
            .ok_or_else(|| ShardmanError::internal("could not determine the home directory"))?;
        check_exists(&home.join(".local").join("bin").join("dst-updater"))
    }

    /// Run the updater to completion, capturing combined output.
    ///
    /// A missing script degrades to a failed [`CommandOutput`] so the
    /// dashboard can surface it without special-casing.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> CommandOutput {
        let path = match self.resolve_path() {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "updater unavailable");
                return CommandOutput::failed(e.to_string());
            }
        };

        info!(path = %path.display(), "running updater");
        let result = Command::new(&path).output().await;
        match result {
            Ok(output) => CommandOutput {
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "updater failed to start");
                CommandOutput::failed(format!("failed to run {}: {e}", path.display()))
            }
        }
    }
}

fn check_exists(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ShardmanError::UpdaterNotFound {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_override_errors() {
        let updater = Updater::new(Some(PathBuf::from("/nonexistent/dst-updater")));
        let err = updater.resolve_path().unwrap_err();
        assert!(matches!(err, ShardmanError::UpdaterNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_missing_updater_degrades() {
        let updater = Updater::new(Some(PathBuf::from("/nonexistent/dst-updater")));
        let output = updater.run().await;
        assert!(!output.success);
        assert!(output.stderr.contains("not found"));
    }

    #[tokio::test]
    async fn test_run_executes_override_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("dst-updater");
        std::fs::write(&script, "#!/bin/sh\necho updated\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let updater = Updater::new(Some(script));
        let output = updater.run().await;
        assert!(output.success);
        assert_eq!(output.stdout, "updated");
    }
}
