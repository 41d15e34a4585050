//! Reconcile systemd units with the desired shard list.
//!
//! The `sync` subcommand enforces `shards.conf`: every listed shard gets
//! enabled and started, every managed unit that is *not* listed gets stopped
//! and disabled, and the umbrella target is enabled so the fleet comes back
//! after a reboot.

use std::collections::{BTreeSet, HashSet};

use shardman_core::{CommandOutput, ShardAction};
use tracing::{info, instrument};

use crate::control::ShardController;
use crate::systemctl::{query_membership, run_systemctl, MembershipKind, UMBRELLA_TARGET};

/// One step of a sync run, for reporting.
#[derive(Debug, Clone)]
pub struct SyncStep {
    /// Shard name, or the umbrella target's unit name.
    pub target: String,
    /// The verb that was applied ("start", "disable", ...).
    pub action: String,
    pub output: CommandOutput,
}

impl SyncStep {
    fn new(target: &str, action: &str, output: CommandOutput) -> Self {
        Self {
            target: target.to_string(),
            action: action.to_string(),
            output,
        }
    }
}

/// Synchronize units with the desired shard list, best-effort.
///
/// Returns every step taken so the CLI can print a report. Failures do not
/// short-circuit; a partially reachable supervisor syncs what it can.
#[instrument(level = "info", skip_all, fields(desired = desired.len()))]
pub async fn sync_units(desired: &[String]) -> Vec<SyncStep> {
    let controller = ShardController::new();
    let mut steps = Vec::new();

    let enabled = query_membership(MembershipKind::Enabled).await;
    let running = query_membership(MembershipKind::Running).await;

    // Apply: desired shards get enabled and started.
    for shard in desired {
        info!(shard = %shard, "sync: enabling and starting");
        let output = controller.apply(shard, ShardAction::Enable).await;
        steps.push(SyncStep::new(shard, "enable", output));
        let output = controller.apply(shard, ShardAction::Start).await;
        steps.push(SyncStep::new(shard, "start", output));
    }

    // Prune: managed units not in the desired list get stopped and disabled.
    for stray in prune_list(desired, &enabled, &running) {
        info!(shard = %stray, "sync: pruning stray unit");
        let output = controller.apply(&stray, ShardAction::Stop).await;
        steps.push(SyncStep::new(&stray, "stop", output));
        let output = controller.apply(&stray, ShardAction::Disable).await;
        steps.push(SyncStep::new(&stray, "disable", output));
    }

    // The umbrella target keeps the fleet coming back after reboot.
    let output = run_systemctl(&["enable", "--now", UMBRELLA_TARGET]).await;
    steps.push(SyncStep::new(UMBRELLA_TARGET, "enable", output));

    steps
}

/// Managed shards (enabled or running) that are not in the desired list,
/// in a deterministic order.
fn prune_list(
    desired: &[String],
    enabled: &HashSet<String>,
    running: &HashSet<String>,
) -> Vec<String> {
    let managed: BTreeSet<&String> = enabled.iter().chain(running.iter()).collect();
    managed
        .into_iter()
        .filter(|name| !desired.contains(name))
        .cloned()
        .collect()
}
