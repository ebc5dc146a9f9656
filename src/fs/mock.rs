// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Entries carry mtimes instead of contents: the watcher only ever looks at
/// stat metadata, so that is all the mock models.
#[derive(Debug, Clone)]
pub enum MockEntry {
    File(SystemTime),
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        // Ensure root exists
        entries.insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));

        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Convenience mtime: a fixed distance after the epoch, so tests can
    /// express ordering with small integers.
    pub fn mtime(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    /// Add a file with the given mtime, creating parent directories
    /// implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, mtime: SystemTime) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.clone(), MockEntry::File(mtime));

        if let Some(parent) = path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new("/")
            } else {
                parent
            };

            self.ensure_dir_entry(&mut entries, parent);
            // Add this file to parent's children
            if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if !children.contains(&name.to_string()) {
                        children.push(name.to_string());
                    }
                }
            }
        }
    }

    /// Overwrite a file's mtime, simulating a modification.
    pub fn touch(&self, path: impl AsRef<Path>, mtime: SystemTime) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(path.as_ref().to_path_buf(), MockEntry::File(mtime));
    }

    /// Remove a file, simulating a deletion.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.entries.lock().unwrap();
        entries.remove(&path);
        if let Some(parent) = path.parent() {
            if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    children.retain(|c| c != name);
                }
            }
        }
    }

    fn ensure_dir_entry(&self, entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if !entries.contains_key(path) {
            entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
            if let Some(parent) = path.parent() {
                let parent = if parent.as_os_str().is_empty() {
                    Path::new("/")
                } else {
                    parent
                };

                if parent != path {
                    // Avoid infinite loop at root
                    self.ensure_dir_entry(entries, parent);
                    // Add this dir to parent's children
                    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                            if !children.contains(&name.to_string()) {
                                children.push(name.to_string());
                            }
                        }
                    }
                }
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        entries.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let entries = self.entries.lock().unwrap();
        matches!(entries.get(path), Some(MockEntry::Dir(_)))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::File(mtime)) => Ok(*mtime),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // In mock, we just return the path as is, assuming absolute paths are used in tests
        Ok(path.to_path_buf())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
