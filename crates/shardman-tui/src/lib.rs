//! Interactive terminal dashboard for the shard fleet.
//!
//! The dashboard is a single cooperative loop (input, reconciliation,
//! rendering) over a small set of components:
//!
//! - [`selection`]: the focus state machine over shard rows and the global
//!   action grid
//! - [`event`]: raw key events mapped to application events
//! - [`jobs`]: the single-slot background job runner for mutating actions
//! - [`log_view`]: the static command-output viewer
//! - panels ([`shard_panel`], [`global_panel`], [`side_panel`]): pure render
//!   functions over the current state

pub mod app;
pub mod event;
pub mod global_panel;
pub mod jobs;
pub mod log_view;
pub mod selection;
pub mod shard_panel;
pub mod side_panel;
pub mod theme;

pub use app::{App, AppResult};
