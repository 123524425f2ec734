//! In-memory artifact store implementation using `DashMap`.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use super::ArtifactStore;
use crate::{Error, Result};

/// In-memory blob store keyed by storage-relative path.
///
/// `delete_prefix("a/b")` and `delete_prefix("a/b/")` both remove `a/b`
/// itself and everything under `a/b/`, but never `a/bc`.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: DashMap<String, Vec<u8>>,
    fail_deletes: AtomicBool,
}

impl MemoryArtifactStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a blob at `path`, overwriting any previous content.
    pub fn put(&self, path: impl Into<String>, data: Vec<u8>) {
        self.blobs.insert(path.into(), data);
    }

    /// Check whether a blob exists at exactly `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.blobs.contains_key(path)
    }

    /// All stored paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    /// Number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Make every subsequent delete fail (simulates a storage outage).
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

impl ArtifactStore for MemoryArtifactStore {
    async fn delete_prefix(&self, path: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::ArtifactStore(format!("delete of {path:?} rejected")));
        }

        let prefix = path.trim_end_matches('/');
        if prefix.is_empty() {
            return Err(Error::ArtifactStore("refusing to delete an empty prefix".into()));
        }

        let nested = format!("{prefix}/");
        self.blobs
            .retain(|key, _| key != prefix && !key.starts_with(&nested));
        Ok(())
    }
}
