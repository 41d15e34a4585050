//! Core types and infrastructure shared across the shardman workspace.
//!
//! This crate holds the pieces every other crate needs: the [`Shard`] data
//! model, the [`ShardmanError`] error type, and the tracing-based logging
//! bootstrap.

pub mod error;
pub mod logging;
pub mod types;

pub use error::{Result, ShardmanError};
pub use logging::{init_logging, init_test_logging, LogGuard};
pub use types::{CommandOutput, Shard, ShardAction, MASTER_SHARD};
