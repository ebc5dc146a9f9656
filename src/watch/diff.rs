// src/watch/diff.rs

//! The snapshot-diff engine.
//!
//! `diff` is pure: it never touches the filesystem and does not mutate its
//! inputs. Everything the watcher reports flows through here.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::snapshot::Snapshot;

/// How a path changed between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// The set of path-level differences between two snapshots.
///
/// Built fresh on every diff; ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: BTreeMap<PathBuf, ChangeKind>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, kind: ChangeKind) {
        self.entries.insert(path.into(), kind);
    }

    pub fn kind_of(&self, path: &Path) -> Option<ChangeKind> {
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

    pub fn iter(&self) -> impl Iterator<Item = (&Path, ChangeKind)> {
        self.entries.iter().map(|(p, k)| (p.as_path(), *k))
    }
}

impl IntoIterator for ChangeSet {
    type Item = (PathBuf, ChangeKind);
    type IntoIter = std::collections::btree_map::IntoIter<PathBuf, ChangeKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Compute the change set between two snapshots.
///
/// Classification:
/// - in `current` but not `previous` → `created`
/// - in both, with differing mtimes → `updated`
/// - in `previous` but not `current` → `deleted`
///
/// The deletion pass only considers paths genuinely absent from `current`, so
/// a path whose timestamp changed stays `updated`. The result is non-empty
/// iff any path's presence or timestamp differs between the snapshots.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> ChangeSet {
    let mut changes = ChangeSet::new();

    for (path, mtime) in current.iter() {
        match previous.mtime_of(path) {
            None => changes.insert(path, ChangeKind::Created),
            Some(prev_mtime) if prev_mtime != mtime => {
                changes.insert(path, ChangeKind::Updated)
            }
            Some(_) => {}
        }
    }

    for path in previous.paths() {
        if !current.contains(path) {
            changes.insert(path, ChangeKind::Deleted);
        }
    }

    changes
}
