//! Temporary directory trees with controllable modification times.
//!
//! Polling tests must not depend on filesystem mtime granularity (coarse
//! timestamps can make a quick write invisible to an mtime poll), so every
//! mutation here sets an explicit mtime via `filetime`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

/// A scratch tree rooted in a `TempDir`.
///
/// Relative paths are used throughout; parent directories are created on
/// demand. The tree is deleted when the value is dropped.
pub struct TempTree {
    dir: TempDir,
}

impl TempTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("creating temp tree"),
        }
    }

    /// Absolute root of the tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a tree-relative entry.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Create (or truncate) a file and pin its mtime to `now + offset_secs`.
    pub fn write_file(&self, rel: &str, offset_secs: i64) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("creating parent dirs");
        }
        fs::write(&path, rel.as_bytes()).expect("writing file");
        self.set_mtime(&path, offset_secs);
        path
    }

    /// Create an empty directory.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("creating dir");
        path
    }

    /// Bump an existing file's mtime to `now + offset_secs` without touching
    /// its contents.
    pub fn touch(&self, rel: &str, offset_secs: i64) {
        let path = self.path(rel);
        self.set_mtime(&path, offset_secs);
    }

    /// Remove a file.
    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).expect("removing file");
    }

    fn set_mtime(&self, path: &Path, offset_secs: i64) {
        let base = SystemTime::now();
        let when = if offset_secs >= 0 {
            base + Duration::from_secs(offset_secs as u64)
        } else {
            base - Duration::from_secs(offset_secs.unsigned_abs())
        };
        filetime::set_file_mtime(path, FileTime::from_system_time(when))
            .expect("setting mtime");
    }
}

impl Default for TempTree {
    fn default() -> Self {
        Self::new()
    }
}
