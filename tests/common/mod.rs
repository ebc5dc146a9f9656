#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pollwatch::errors::Result;
use pollwatch::watch::{ChangeHandler, ChangeKind, ChangeSet};

/// Shared log of every change set a watcher delivered, in order.
pub type ChangeLog = Arc<Mutex<Vec<ChangeSet>>>;

/// Handler that records delivered change sets instead of printing them.
pub struct RecordingHandler {
    log: ChangeLog,
}

impl RecordingHandler {
    pub fn new() -> (Self, ChangeLog) {
        let log: ChangeLog = Arc::new(Mutex::new(Vec::new()));
        (Self { log: log.clone() }, log)
    }
}

impl ChangeHandler for RecordingHandler {
    fn on_change(
        &mut self,
        changes: ChangeSet,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let log = Arc::clone(&self.log);
        Box::pin(async move {
            log.lock().unwrap().push(changes);
            Ok(())
        })
    }
}

/// Poll `cond` until it holds or `timeout` elapses; returns whether it held.
pub async fn wait_for<F>(cond: F, timeout: Duration) -> bool
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Latest change kind recorded for a path whose string form ends with
/// `suffix`, if any notification mentioned it.
pub fn last_kind_for(log: &ChangeLog, suffix: &str) -> Option<ChangeKind> {
    let log = log.lock().unwrap();
    let mut found = None;
    for changes in log.iter() {
        for (path, kind) in changes.iter() {
            if path.to_string_lossy().ends_with(suffix) {
                found = Some(kind);
            }
        }
    }
    found
}

/// True if any recorded change set mentions a path ending with `suffix`.
pub fn log_mentions(log: &ChangeLog, suffix: &str) -> bool {
    last_kind_for(log, suffix).is_some()
}

/// Number of change sets recorded so far.
pub fn log_len(log: &ChangeLog) -> usize {
    log.lock().unwrap().len()
}
