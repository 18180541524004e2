//! File-backed session store.
//!
//! Responsibilities:
//! - Keep the session entries in a small JSON object on disk.
//! - Replace the file atomically (temp file in the same directory, then rename).
//!
//! Does NOT handle:
//! - Choosing the file location (see `coop_config::default_state_path`).
//!
//! Invariants:
//! - A missing, unreadable or corrupt file reads as an empty store (logged at `warn`).
//! - The file is re-read on every access so separate processes sharing it
//!   observe each other's writes.
//! - Write failures are logged and never panic.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SessionStore;

type Entries = BTreeMap<String, String>;

/// [`SessionStore`] persisted as a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Entries {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Entries::new(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read session state, treating as empty"
                );
                return Entries::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Corrupt session state, treating as empty"
            );
            Entries::new()
        })
    }

    fn save(&self, entries: &Entries) -> std::io::Result<()> {
        write_atomic(&self.path, &serde_json::to_vec_pretty(entries)?)?;
        tracing::debug!(path = %self.path.display(), "Session state saved");
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load();
        apply(&mut entries);
        if let Err(e) = self.save(&entries) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist session state"
            );
        }
    }
}

/// Replace `path` with `content` via a temp file in the same directory.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
    temp.write_all(content)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }
}
