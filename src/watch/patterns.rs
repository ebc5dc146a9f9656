// src/watch/patterns.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;

/// Compiled watch/exclude glob patterns plus the root they are evaluated
/// against.
///
/// `resolve` is the path-expansion collaborator of the poll loop: it turns the
/// user-supplied patterns into the concrete, deduplicated, ordered set of
/// absolute file paths that one snapshot covers. It is called once per
/// snapshot, so files appearing in (or vanishing from) matched directories are
/// picked up on the next poll.
pub struct PathResolver {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl PathResolver {
    /// Compile the pattern lists.
    ///
    /// Patterns are evaluated relative to `root`. A literal pattern (no glob
    /// metacharacters) also matches everything beneath it, so naming a
    /// directory watches the files it contains, recursively.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        watch: &[String],
        exclude: &[String],
    ) -> Result<Self> {
        let root = root.into();
        let root = fs.canonicalize(&root).unwrap_or(root);

        let watch_set = build_globset(watch)?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };

        Ok(Self {
            fs,
            root,
            watch_set,
            exclude_set,
        })
    }

    /// Root directory the patterns are evaluated against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if the watch set covers the given root-relative path and
    /// the exclude set does not.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }

    /// Expand the patterns into the current candidate set: every file under
    /// the root matched by the watch set minus the exclude set, absolute,
    /// deduplicated and ordered.
    ///
    /// Directories that vanish mid-walk are skipped; a path listed here may
    /// still fail its stat by snapshot time and is handled there.
    pub fn resolve(&self) -> BTreeSet<PathBuf> {
        let mut files = BTreeSet::new();
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            let entries = match self.fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(dir = ?dir, %err, "skipping unreadable directory");
                    continue;
                }
            };

            for path in entries {
                if self.fs.is_dir(&path) {
                    stack.push(path);
                } else if self.fs.is_file(&path) {
                    if let Some(rel) = relative_str(self.fs.as_ref(), &self.root, &path) {
                        if self.matches(&rel) {
                            files.insert(path);
                        }
                    }
                }
            }
        }

        files
    }
}

/// Build a GlobSet from simple string patterns.
///
/// Literal patterns (no metacharacters) are also added as `pat/**`, so a
/// pattern naming a directory expands to the files inside it.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
        if !pat.contains(['*', '?', '[', '{']) {
            let subtree = format!("{}/**", pat.trim_end_matches('/'));
            builder.add(Glob::new(&subtree)?);
        }
    }
    Ok(builder.build()?)
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
fn relative_str(fs: &dyn FileSystem, root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (fs.canonicalize(root), fs.canonicalize(path)) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(rel.to_string_lossy().replace('\\', "/"));
        }
    }

    None
}
