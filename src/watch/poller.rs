// src/watch/poller.rs

//! Async shell around the pure [`WatchState`] machine.
//!
//! One tokio task runs [`PollWatcher::run`]; everyone else holds a cloneable
//! [`WatchHandle`]. All externally triggered mutations (pause, resume, stop,
//! the watched-paths query) travel as [`WatchCommand`]s over an mpsc channel
//! consumed only by the loop, each carrying a oneshot ack the loop fires at
//! the state transition. That ack is what makes the control calls blocking:
//! `pause` does not return until the loop will take no further diff
//! snapshots, `resume` not until polling has restarted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};

use super::diff::ChangeSet;
use super::handler::ChangeHandler;
use super::patterns::PathResolver;
use super::snapshot::Snapshot;
use super::state::WatchState;

use crate::errors::{PollwatchError, Result};
use crate::fs::FileSystem;

/// Options for one watch lifecycle.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Delay between successive snapshots.
    pub interval: Duration,
    /// Invoke the handler once with an empty change set before polling.
    pub immediate: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            immediate: false,
        }
    }
}

/// Control commands consumed by the poll loop.
#[derive(Debug)]
pub enum WatchCommand {
    Pause { ack: oneshot::Sender<Result<()>> },
    Resume { ack: oneshot::Sender<Result<()>> },
    Stop { ack: oneshot::Sender<()> },
    WatchedPaths { reply: oneshot::Sender<Vec<PathBuf>> },
}

/// Cloneable handle for controlling a running watch from other tasks.
///
/// Every method fails with [`PollwatchError::WatchStopped`] once the loop has
/// exited (or its task was aborted).
#[derive(Debug, Clone)]
pub struct WatchHandle {
    tx: mpsc::Sender<WatchCommand>,
}

impl WatchHandle {
    pub fn new(tx: mpsc::Sender<WatchCommand>) -> Self {
        Self { tx }
    }

    /// Suspend change detection.
    ///
    /// On return the loop has captured the pause-time boundary snapshot and
    /// will take no further diff snapshots until [`resume`](Self::resume).
    /// Pausing an already-paused watch is a no-op.
    pub async fn pause(&self) -> Result<()> {
        let (ack, ack_rx) = oneshot::channel();
        self.send(WatchCommand::Pause { ack }).await?;
        recv_ack(ack_rx).await?
    }

    /// Resume change detection from a fresh baseline.
    ///
    /// Fails with [`PollwatchError::NotPaused`] when the watch is not
    /// currently pausing. On return the loop has restarted polling.
    pub async fn resume(&self) -> Result<()> {
        let (ack, ack_rx) = oneshot::channel();
        self.send(WatchCommand::Resume { ack }).await?;
        recv_ack(ack_rx).await?
    }

    /// Request a graceful stop.
    ///
    /// Returns once the loop has observed the request; pending changes up to
    /// the stop boundary are still delivered by the drain pass before the
    /// watch task finishes.
    pub async fn stop(&self) -> Result<()> {
        let (ack, ack_rx) = oneshot::channel();
        self.send(WatchCommand::Stop { ack }).await?;
        recv_ack(ack_rx).await
    }

    /// The most recently observed set of watched paths (keys of the last
    /// snapshot taken).
    pub async fn watched_paths(&self) -> Result<Vec<PathBuf>> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(WatchCommand::WatchedPaths { reply }).await?;
        recv_ack(reply_rx).await
    }

    async fn send(&self, cmd: WatchCommand) -> Result<()> {
        self.tx
            .send(cmd)
            .await
            .map_err(|_| PollwatchError::WatchStopped)
    }
}

async fn recv_ack<T>(rx: oneshot::Receiver<T>) -> Result<T> {
    rx.await.map_err(|_| PollwatchError::WatchStopped)
}

/// The poll loop: takes snapshots at the configured interval, diffs them and
/// delivers non-empty change sets to the handler, honoring control commands
/// issued through a [`WatchHandle`].
pub struct PollWatcher {
    fs: Arc<dyn FileSystem>,
    resolver: PathResolver,
    options: WatchOptions,
}

impl std::fmt::Debug for PollWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollWatcher")
            .field("resolver", &self.resolver)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PollWatcher {
    pub fn new(fs: Arc<dyn FileSystem>, resolver: PathResolver, options: WatchOptions) -> Self {
        Self {
            fs,
            resolver,
            options,
        }
    }

    /// Main watch loop.
    ///
    /// Runs until a stop command arrives or every [`WatchHandle`] is dropped,
    /// then drains trailing changes up to the end boundary. Handler errors
    /// propagate out and end the watch.
    pub async fn run<H: ChangeHandler>(
        self,
        mut control_rx: mpsc::Receiver<WatchCommand>,
        mut handler: H,
    ) -> Result<()> {
        info!(root = ?self.resolver.root(), interval = ?self.options.interval, "poll watcher started");

        if self.options.immediate {
            handler.on_change(ChangeSet::new()).await?;
        }

        let mut state = WatchState::new(self.take_snapshot());
        debug!(paths = state.watched_paths().len(), "initial snapshot taken");

        while state.is_watching() {
            if state.is_pausing() {
                // Paused sub-loop: no snapshots, no diffs, only control.
                match control_rx.recv().await {
                    Some(cmd) => self.handle_command(cmd, &mut state),
                    None => state.request_stop(),
                }
                continue;
            }

            tokio::select! {
                _ = time::sleep(self.options.interval) => {
                    let changes = state.observe(self.take_snapshot());
                    if !changes.is_empty() {
                        debug!(changes = changes.len(), "changes detected");
                        handler.on_change(changes).await?;
                    }
                }
                cmd = control_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd, &mut state),
                    None => state.request_stop(),
                }
            }
        }

        self.drain(&mut state, &mut handler).await?;

        info!("poll watcher stopped");
        Ok(())
    }

    /// Apply a single control command to the state.
    fn handle_command(&self, cmd: WatchCommand, state: &mut WatchState) {
        match cmd {
            WatchCommand::Pause { ack } => {
                if !state.is_pausing() {
                    state.begin_pause(self.take_snapshot());
                    info!("watch paused");
                }
                let _ = ack.send(Ok(()));
            }
            WatchCommand::Resume { ack } => {
                let result = if state.is_pausing() {
                    state.resume(self.take_snapshot())
                } else {
                    Err(PollwatchError::NotPaused)
                };
                if result.is_ok() {
                    info!("watch resumed");
                }
                let _ = ack.send(result);
            }
            WatchCommand::Stop { ack } => {
                state.request_stop();
                // Stopping while paused finalizes against the pause-time
                // boundary; freeze_end keeps it.
                if !state.has_end_snapshot() {
                    state.freeze_end(self.take_snapshot());
                }
                info!("watch stop requested");
                let _ = ack.send(());
            }
            WatchCommand::WatchedPaths { reply } => {
                let _ = reply.send(state.watched_paths());
            }
        }
    }

    /// Drain trailing changes after the loop exits.
    ///
    /// Diffs the end snapshot (frozen at pause/stop time, or fresh per round
    /// when none was frozen) against the baseline until a round yields no
    /// changes, delivering each non-empty change set.
    async fn drain<H: ChangeHandler>(
        &self,
        state: &mut WatchState,
        handler: &mut H,
    ) -> Result<()> {
        let frozen = state.take_end_snapshot();
        loop {
            let end = match &frozen {
                Some(snapshot) => snapshot.clone(),
                None => self.take_snapshot(),
            };
            let changes = state.observe(end);
            if changes.is_empty() {
                break;
            }
            debug!(changes = changes.len(), "draining trailing changes");
            handler.on_change(changes).await?;
        }
        Ok(())
    }

    fn take_snapshot(&self) -> Snapshot {
        Snapshot::capture(self.fs.as_ref(), self.resolver.resolve())
    }
}

/// Wire up a control channel and run the watcher on a new tokio task.
///
/// Returns the control handle and the join handle of the loop task; awaiting
/// the latter yields the loop's result after a stop has drained.
pub fn spawn_watcher<H>(
    fs: Arc<dyn FileSystem>,
    resolver: PathResolver,
    options: WatchOptions,
    handler: H,
) -> (WatchHandle, JoinHandle<Result<()>>)
where
    H: ChangeHandler + 'static,
{
    let (ctrl_tx, ctrl_rx) = mpsc::channel::<WatchCommand>(16);
    let handle = WatchHandle::new(ctrl_tx);
    let watcher = PollWatcher::new(fs, resolver, options);
    let join = tokio::spawn(watcher.run(ctrl_rx, handler));
    (handle, join)
}
