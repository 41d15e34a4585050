//! Low-level systemctl invocation and output parsing.

use std::collections::HashSet;

use shardman_core::CommandOutput;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Template unit prefix for shard units.
pub const UNIT_PREFIX: &str = "dontstarve@";
/// Unit suffix for shard units.
pub const UNIT_SUFFIX: &str = ".service";
/// Umbrella target that groups the whole fleet.
pub const UMBRELLA_TARGET: &str = "dontstarve.target";

/// Full unit name for a shard (`dontstarve@Master.service`).
pub fn unit_name(shard: &str) -> String {
    format!("{UNIT_PREFIX}{shard}{UNIT_SUFFIX}")
}

/// Extract the shard name from a template unit instance, if it is one.
pub fn shard_from_unit(unit: &str) -> Option<&str> {
    let instance = unit.strip_prefix(UNIT_PREFIX)?.strip_suffix(UNIT_SUFFIX)?;
    if instance.is_empty() {
        None
    } else {
        Some(instance)
    }
}

/// Run `systemctl --user` with the given arguments.
///
/// Never returns an error: a missing binary or spawn failure becomes a
/// failed [`CommandOutput`] with a diagnostic in stderr, matching how the
/// dashboard treats an unreachable supervisor (degrade, don't abort).
#[instrument(level = "debug", skip_all, fields(args = ?args))]
pub async fn run_systemctl(args: &[&str]) -> CommandOutput {
    let result = Command::new("systemctl")
        .arg("--user")
        .args(args)
        .output()
        .await;

    match result {
        Ok(output) => CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        },
        Err(e) => {
            warn!(error = %e, "failed to invoke systemctl");
            CommandOutput::failed(format!("systemctl command not found or not runnable: {e}"))
        }
    }
}

/// Which membership set to query from the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipKind {
    /// Units whose unit file is in the `enabled` state.
    Enabled,
    /// Units currently `active`.
    Running,
}

/// Query the set of shard names in the given membership state.
///
/// Any failure (tool missing, non-zero exit) degrades to the empty set; a
/// shard with no data simply renders as stopped/disabled.
#[instrument(level = "debug", skip_all, fields(kind = ?kind))]
pub async fn query_membership(kind: MembershipKind) -> HashSet<String> {
    let pattern = format!("{UNIT_PREFIX}*{UNIT_SUFFIX}");
    let output = match kind {
        MembershipKind::Running => {
            run_systemctl(&[
                "list-units",
                "--no-legend",
                &pattern,
                "--state",
                "active",
            ])
            .await
        }
        MembershipKind::Enabled => {
            run_systemctl(&["list-unit-files", "--no-legend", &pattern]).await
        }
    };

    if !output.success {
        warn!(kind = ?kind, stderr = %output.stderr, "membership query failed");
        return HashSet::new();
    }

    let members = match kind {
        MembershipKind::Running => parse_units(&output.stdout),
        MembershipKind::Enabled => parse_unit_files(&output.stdout, "enabled"),
    };
    debug!(kind = ?kind, count = members.len(), "membership query");
    members
}

/// Parse `list-units --no-legend` output into shard names.
///
/// The unit name is the first column; the state was already filtered by
/// `--state active`.
fn parse_units(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter_map(shard_from_unit)
        .map(str::to_string)
        .collect()
}

/// Parse `list-unit-files --no-legend` output into shard names whose unit
/// file state matches `state` (second column).
fn parse_unit_files(stdout: &str, state: &str) -> HashSet<String> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let unit = parts.next()?;
            let unit_state = parts.next()?;
            if unit_state != state {
                return None;
            }
            shard_from_unit(unit)
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_name_round_trip() {
        let unit = unit_name("Master");
        assert_eq!(unit, "dontstarve@Master.service");
        assert_eq!(shard_from_unit(&unit), Some("Master"));
    }

    #[test]
    fn test_shard_from_unit_rejects_foreign_units() {
        assert_eq!(shard_from_unit("nginx.service"), None);
        assert_eq!(shard_from_unit("dontstarve@.service"), None);
        assert_eq!(shard_from_unit("dontstarve@Caves"), None);
    }

    #[test]
    fn test_parse_units() {
        let stdout = "\
dontstarve@Master.service loaded active running Don't Starve shard Master
dontstarve@Caves.service  loaded active running Don't Starve shard Caves
other.service             loaded active running something else";
        let members = parse_units(stdout);
        assert_eq!(members.len(), 2);
        assert!(members.contains("Master"));
        assert!(members.contains("Caves"));
    }

    #[test]
    fn test_parse_unit_files_filters_state() {
        let stdout = "\
dontstarve@Master.service enabled  enabled
dontstarve@Caves.service  disabled enabled
dontstarve@.service       enabled  -";
        let members = parse_unit_files(stdout, "enabled");
        assert_eq!(members.len(), 1);
        assert!(members.contains("Master"));
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_units("").is_empty());
        assert!(parse_unit_files("", "enabled").is_empty());
    }
}
