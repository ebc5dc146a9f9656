// src/watch/state.rs

//! Pure watch-lifecycle state machine.
//!
//! This module contains a synchronous, deterministic state value owned by the
//! poll loop. It holds the baseline snapshot, the optional frozen end
//! snapshot and the pausing/keep-watching flags, and applies every lifecycle
//! transition to them.
//!
//! The async/IO-heavy shell (`watch::poller::PollWatcher`) is responsible
//! for:
//! - sleeping on the poll interval and taking snapshots
//! - consuming control commands from the handle
//! - delivering change sets to the notification handler
//!
//! The state machine is intended to be extensively tested without any Tokio,
//! channels or filesystem.

use std::path::{Path, PathBuf};

use super::diff::{diff, ChangeSet};
use super::snapshot::Snapshot;

use crate::errors::{PollwatchError, Result};

/// Lifecycle state of one watch.
///
/// Constructed explicitly from the initial baseline snapshot; there is no
/// lazy initialisation.
#[derive(Debug)]
pub struct WatchState {
    /// Baseline the next diff runs against.
    last: Snapshot,
    /// Frozen end-of-watch boundary, set while pausing or stopping.
    end_snapshot: Option<Snapshot>,
    pausing: bool,
    keep_watching: bool,
}

impl WatchState {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            last: initial,
            end_snapshot: None,
            pausing: false,
            keep_watching: true,
        }
    }

    pub fn is_pausing(&self) -> bool {
        self.pausing
    }

    pub fn is_watching(&self) -> bool {
        self.keep_watching
    }

    pub fn has_end_snapshot(&self) -> bool {
        self.end_snapshot.is_some()
    }

    /// Fold one freshly taken snapshot into the state: diff it against the
    /// baseline, make it the new baseline, and return the (possibly empty)
    /// change set.
    pub fn observe(&mut self, current: Snapshot) -> ChangeSet {
        let changes = diff(&self.last, &current);
        self.last = current;
        changes
    }

    /// Enter the paused sub-state, keeping `end` as the boundary a stop
    /// issued during the pause will finalize against.
    pub fn begin_pause(&mut self, end: Snapshot) {
        self.pausing = true;
        self.end_snapshot = Some(end);
    }

    /// Leave the paused sub-state, re-baselining from `fresh`.
    ///
    /// Mutations that happened while paused are deliberately not reported:
    /// they are absorbed into the new baseline. The pause boundary is
    /// discarded.
    ///
    /// Fails when the watch is not currently pausing (or already stopped);
    /// resuming a never-paused watch is a caller bug, not a no-op.
    pub fn resume(&mut self, fresh: Snapshot) -> Result<()> {
        if !self.keep_watching || !self.pausing {
            return Err(PollwatchError::NotPaused);
        }
        self.last = fresh;
        self.end_snapshot = None;
        self.pausing = false;
        Ok(())
    }

    /// Clear the keep-watching flag. The loop drains via [`observe`] calls
    /// against the end snapshot after it exits.
    pub fn request_stop(&mut self) {
        self.keep_watching = false;
    }

    /// Freeze `end` as the finalize boundary, unless one is already frozen
    /// (a pause-time boundary wins over a stop-time one).
    pub fn freeze_end(&mut self, end: Snapshot) {
        self.end_snapshot.get_or_insert(end);
    }

    /// Take the frozen end snapshot, clearing the marker.
    pub fn take_end_snapshot(&mut self) -> Option<Snapshot> {
        self.end_snapshot.take()
    }

    /// Keys of the most recent baseline snapshot, in order.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.last.paths().map(Path::to_path_buf).collect()
    }
}
