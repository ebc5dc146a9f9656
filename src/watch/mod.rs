// src/watch/mod.rs

//! Polling change detection.
//!
//! This module is responsible for:
//! - Compiling watch / exclude glob patterns and expanding them into the
//!   current candidate path set.
//! - Capturing mtime snapshots of that set and diffing successive snapshots
//!   into change sets.
//! - Driving the watch/pause/resume/stop/finalize lifecycle from a dedicated
//!   poll loop, controlled through a channel-backed handle.
//!
//! It does **not** use native filesystem event APIs; detection latency is
//! bounded by the poll interval by design.

pub mod diff;
pub mod handler;
pub mod patterns;
pub mod poller;
pub mod snapshot;
pub mod state;

pub use diff::{diff, ChangeKind, ChangeSet};
pub use handler::{ChangeHandler, StdoutHandler};
pub use patterns::PathResolver;
pub use poller::{spawn_watcher, PollWatcher, WatchCommand, WatchHandle, WatchOptions};
pub use snapshot::{Snapshot, ABSENT_MTIME};
pub use state::WatchState;
