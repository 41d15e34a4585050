//! Shard status polling.

use std::collections::HashSet;

use shardman_core::Shard;
use tracing::{debug, instrument};

use crate::systemctl::{query_membership, MembershipKind};

/// Read-only provider of fleet status snapshots.
///
/// Holds the desired shard list (fixed at startup, in operator-declared
/// order) and combines it with two supervisor membership queries. Order
/// preservation matters: the dashboard selects shards by row index, and the
/// index must stay stable across polls when only status flips.
#[derive(Debug, Clone)]
pub struct StatusProvider {
    desired: Vec<String>,
}

impl StatusProvider {
    /// Create a provider for the given desired shard list.
    pub fn new(desired: Vec<String>) -> Self {
        Self { desired }
    }

    /// The desired shard names in declared order.
    pub fn desired(&self) -> &[String] {
        &self.desired
    }

    /// Poll the supervisor and build a fresh snapshot.
    ///
    /// Pure read, no side effects. A failing supervisor degrades both
    /// membership sets to empty, so every shard shows as stopped/disabled
    /// rather than the poll erroring out.
    #[instrument(level = "debug", skip_all)]
    pub async fn poll(&self) -> Vec<Shard> {
        let enabled = query_membership(MembershipKind::Enabled).await;
        let running = query_membership(MembershipKind::Running).await;
        let snapshot = self.assemble(&enabled, &running);
        debug!(
            shards = snapshot.len(),
            running = snapshot.iter().filter(|s| s.is_running).count(),
            "status poll"
        );
        snapshot
    }

    fn assemble(&self, enabled: &HashSet<String>, running: &HashSet<String>) -> Vec<Shard> {
        self.desired
            .iter()
            .map(|name| Shard {
                name: name.clone(),
                is_enabled: enabled.contains(name),
                is_running: running.contains(name),
            })
            .collect()
    }
}
