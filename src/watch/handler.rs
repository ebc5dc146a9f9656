// src/watch/handler.rs

//! Pluggable notification sink abstraction.
//!
//! The poll loop talks to a `ChangeHandler` instead of a concrete callback.
//! This makes it easy to swap in a recording handler in tests while keeping
//! the production stdout printer here.

use std::future::Future;
use std::pin::Pin;

use super::diff::ChangeSet;
use crate::errors::Result;

/// Trait abstracting how detected changes are delivered.
///
/// The loop awaits each delivery to completion before taking the next
/// snapshot, so at most one notification is in flight at a time and a slow
/// handler delays detection of subsequent changes. A returned error
/// propagates out of the poll loop and ends the watch.
pub trait ChangeHandler: Send {
    /// Deliver one non-empty change set (or the single empty one sent for
    /// immediate-notification mode).
    fn on_change(
        &mut self,
        changes: ChangeSet,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Handler used by the CLI front end: one `<kind> <path>` line per entry on
/// stdout.
#[derive(Debug, Clone, Default)]
pub struct StdoutHandler;

impl ChangeHandler for StdoutHandler {
    fn on_change(
        &mut self,
        changes: ChangeSet,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for (path, kind) in changes.iter() {
                println!("{kind} {}", path.display());
            }
            Ok(())
        })
    }
}
