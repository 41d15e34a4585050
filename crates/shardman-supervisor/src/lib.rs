//! systemd adapter for the shard fleet.
//!
//! All interaction with the process supervisor lives here: status polling,
//! per-unit actions, log retrieval, the external updater, and the
//! `shards.conf` reconciliation used by the `sync` subcommand.
//!
//! Shards map onto template unit instances (`dontstarve@<name>.service`)
//! under the user manager (`systemctl --user`). Every adapter in this crate
//! degrades rather than fails: a missing `systemctl` binary produces empty
//! membership sets and failed [`CommandOutput`]s, never a panic or a fatal
//! error in the dashboard loop.

pub mod control;
pub mod status;
pub mod sync;
pub mod systemctl;
pub mod updater;

pub use control::ShardController;
pub use status::StatusProvider;
pub use sync::{sync_units, SyncStep};
pub use systemctl::{query_membership, unit_name, MembershipKind, UMBRELLA_TARGET};
pub use updater::Updater;
