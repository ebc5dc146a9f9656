// src/watch/snapshot.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::fs::FileSystem;

/// Timestamp recorded for a path whose stat failed at capture time.
///
/// Strictly earlier than any real file's mtime, so such paths diff uniformly
/// with freshly created ones instead of being dropped from the snapshot.
pub const ABSENT_MTIME: SystemTime = SystemTime::UNIX_EPOCH;

/// A timestamped view of the watched paths at one instant.
///
/// Ordered by path; each path appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, SystemTime>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stat every candidate path and record its mtime.
    ///
    /// A failed stat (path vanished between listing and stat, permissions,
    /// ...) records [`ABSENT_MTIME`] and is never an error.
    pub fn capture<I>(fs: &dyn FileSystem, paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut snapshot = Self::new();
        for path in paths {
            let mtime = match fs.modified(&path) {
                Ok(mtime) => mtime,
                Err(err) => {
                    debug!(path = ?path, %err, "stat failed; recording sentinel mtime");
                    ABSENT_MTIME
                }
            };
            snapshot.record(path, mtime);
        }
        snapshot
    }

    /// Record one (path, mtime) entry, replacing any previous entry for the
    /// same path.
    pub fn record(&mut self, path: impl Into<PathBuf>, mtime: SystemTime) {
        self.entries.insert(path.into(), mtime);
    }

    pub fn mtime_of(&self, path: &Path) -> Option<SystemTime> {
        self.entries.get(path).copied()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths covered by this snapshot, in order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, SystemTime)> {
        self.entries.iter().map(|(p, t)| (p.as_path(), *t))
    }
}
