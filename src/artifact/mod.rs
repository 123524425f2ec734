//! Artifact store capability and artifact path conventions
//!
//! The cascade only ever needs one storage operation: delete everything at
//! or below a path. Concrete backends (GCS, S3, local disk) live with the
//! caller; this crate ships an in-memory store for tests and demos.

mod memory;
mod path;

pub use memory::MemoryArtifactStore;
pub use path::{
    experiment_artifact_root, run_artifact_path, EXPERIMENT_ROOT_SEGMENTS, SCHEME_PREFIX_LEN,
};

use crate::Result;
use std::future::Future;

/// Delete-by-prefix capability over an object store.
pub trait ArtifactStore: Send + Sync {
    /// Delete all blobs at or under `path`.
    ///
    /// `path` is treated as a prefix with or without a trailing slash.
    /// Succeeds if nothing exists there (idempotent).
    fn delete_prefix(&self, path: &str) -> impl Future<Output = Result<()>> + Send;
}
