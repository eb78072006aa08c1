//! On-disk page cache: a JSON object mapping request URL to raw HTML.
//!
//! The file is read once when the cache is opened and rewritten whole on
//! flush. There is no locking, so two processes sharing one cache file can
//! lose each other's entries.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ShelfStatError;

/// What happened when the cache file was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLoad {
    Loaded { entries: usize },
    /// No file yet; starting empty.
    Missing,
    /// The file existed but could not be read or decoded; starting empty.
    Corrupt { reason: String },
}

/// When dirty entries are written back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Rewrite the whole file after every miss.
    EveryMiss,
    /// Write once, when the caller flushes at the end of a run.
    #[default]
    OnFinish,
}

pub struct PageCache {
    path: PathBuf,
    entries: HashMap<String, String>,
    dirty: bool,
}

impl PageCache {
    /// Reads the cache file at `path`. A missing or undecodable file yields an
    /// empty cache; the returned [`CacheLoad`] says which case applied.
    pub fn open(path: impl AsRef<Path>) -> (Self, CacheLoad) {
        let path = path.as_ref().to_path_buf();
        let (entries, outcome) = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(entries) => {
                    let outcome = CacheLoad::Loaded {
                        entries: entries.len(),
                    };
                    (entries, outcome)
                }
                Err(e) => (
                    HashMap::new(),
                    CacheLoad::Corrupt {
                        reason: e.to_string(),
                    },
                ),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (HashMap::new(), CacheLoad::Missing)
            }
            Err(e) => (
                HashMap::new(),
                CacheLoad::Corrupt {
                    reason: e.to_string(),
                },
            ),
        };

        if let CacheLoad::Corrupt { ref reason } = outcome {
            tracing::warn!(
                "Page cache {} unreadable ({}), starting empty",
                path.display(),
                reason
            );
        }

        (
            Self {
                path,
                entries,
                dirty: false,
            },
            outcome,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Inserts or overwrites an entry. Nothing is written until [`flush`](Self::flush).
    pub fn put(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rewrites the whole cache file if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<(), ShelfStatError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string(&self.entries)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ShelfStatError::Cache(format!("create {}: {}", parent.display(), e))
                })?;
            }
        }
        fs::write(&self.path, json).map_err(|e| {
            ShelfStatError::Cache(format!("write {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(
            "Wrote {} cached pages to {}",
            self.entries.len(),
            self.path.display()
        );
        self.dirty = false;
        Ok(())
    }
}
