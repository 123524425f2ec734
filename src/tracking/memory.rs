//! In-memory tracking store implementation using `DashMap`.
//!
//! Mirrors the tracking server's soft-delete semantics so the cascade can be
//! exercised without a network. Data is lost when the store is dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::{DashMap, DashSet};

use super::{LifecycleStage, MetadataGateway, RunSummary};
use crate::error::RESOURCE_DOES_NOT_EXIST;
use crate::{Error, Result};

const INVALID_PARAMETER_VALUE: &str = "INVALID_PARAMETER_VALUE";
const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

#[derive(Debug)]
struct StoredRun {
    seq: u64,
    run: RunSummary,
}

/// In-memory tracking store.
///
/// Thread-safe; experiments and runs live in lock-free concurrent maps.
/// Search returns active runs in insertion order.
///
/// # Example
///
/// ```rust
/// use mlflow_cascade::tracking::{LifecycleStage, MemoryTrackingStore, MetadataGateway};
///
/// # async fn example() -> mlflow_cascade::Result<()> {
/// let store = MemoryTrackingStore::new();
/// store.add_experiment("7");
/// store.delete_experiment_record("7").await?;
/// assert_eq!(store.experiment_stage("7"), Some(LifecycleStage::Deleted));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryTrackingStore {
    experiments: DashMap<String, LifecycleStage>,
    runs: DashMap<String, StoredRun>,
    rejected_runs: DashSet<String>,
    next_seq: AtomicU64,
}

impl MemoryTrackingStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active experiment. No-op if it already exists.
    pub fn add_experiment(&self, experiment_id: impl Into<String>) {
        self.experiments
            .entry(experiment_id.into())
            .or_insert(LifecycleStage::Active);
    }

    /// Add (or replace) a run, registering its experiment if needed.
    pub fn add_run(&self, run: RunSummary) {
        self.add_experiment(run.experiment_id());
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.runs
            .insert(run.run_id().to_string(), StoredRun { seq, run });
    }

    /// Make every subsequent `delete_run_record` for this run fail.
    pub fn reject_run_deletes(&self, run_id: impl Into<String>) {
        self.rejected_runs.insert(run_id.into());
    }

    /// Lifecycle stage of an experiment, if known.
    #[must_use]
    pub fn experiment_stage(&self, experiment_id: &str) -> Option<LifecycleStage> {
        self.experiments.get(experiment_id).map(|stage| *stage)
    }

    /// Snapshot of a run, deleted or not.
    #[must_use]
    pub fn run(&self, run_id: &str) -> Option<RunSummary> {
        self.runs.get(run_id).map(|stored| stored.run.clone())
    }

    /// Number of runs held, in any lifecycle stage.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    fn not_found(kind: &str, id: &str) -> Error {
        Error::remote(
            RESOURCE_DOES_NOT_EXIST,
            format!("{kind} with id={id} not found"),
        )
    }
}

impl MetadataGateway for MemoryTrackingStore {
    async fn delete_experiment_record(&self, experiment_id: &str) -> Result<()> {
        let mut stage = self
            .experiments
            .get_mut(experiment_id)
            .ok_or_else(|| Self::not_found("Experiment", experiment_id))?;

        if *stage == LifecycleStage::Deleted {
            return Err(Error::remote(
                INVALID_PARAMETER_VALUE,
                format!("Cannot delete an already deleted experiment: {experiment_id}"),
            ));
        }
        *stage = LifecycleStage::Deleted;
        Ok(())
    }

    async fn delete_run_record(&self, run_id: &str) -> Result<()> {
        if self.rejected_runs.contains(run_id) {
            return Err(Error::remote(
                INTERNAL_ERROR,
                format!("Failed to delete run {run_id}"),
            ));
        }

        let mut stored = self
            .runs
            .get_mut(run_id)
            .ok_or_else(|| Self::not_found("Run", run_id))?;
        stored.run.mark_deleted();
        Ok(())
    }

    async fn search_runs_by_experiment(&self, experiment_id: &str) -> Result<Vec<RunSummary>> {
        let mut matching: Vec<(u64, RunSummary)> = self
            .runs
            .iter()
            .filter(|entry| {
                entry.run.experiment_id() == experiment_id
                    && entry.run.lifecycle_stage() == LifecycleStage::Active
            })
            .map(|entry| (entry.seq, entry.run.clone()))
            .collect();

        matching.sort_by_key(|(seq, _)| *seq);
        Ok(matching.into_iter().map(|(_, run)| run).collect())
    }

    async fn fetch_run(&self, run_id: &str) -> Result<RunSummary> {
        self.run(run_id).ok_or_else(|| Self::not_found("Run", run_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(id: &str, experiment: &str) -> RunSummary {
        RunSummary::new(id, experiment, format!("gs://bucket/mlflow/{experiment}/{id}/artifacts"))
    }

    #[tokio::test]
    async fn test_search_preserves_insertion_order() {
        let store = MemoryTrackingStore::new();
        for id in ["r3", "r1", "r2"] {
            store.add_run(run(id, "7"));
        }
        store.add_run(run("other", "8"));

        let ids: Vec<String> = store
            .search_runs_by_experiment("7")
            .await
            .unwrap()
            .iter()
            .map(|r| r.run_id().to_string())
            .collect();
        assert_eq!(ids, ["r3", "r1", "r2"]);
    }

    #[tokio::test]
    async fn test_search_unknown_experiment_is_empty() {
        let store = MemoryTrackingStore::new();
        assert!(store.search_runs_by_experiment("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_run_is_not_found() {
        let store = MemoryTrackingStore::new();
        let err = store.delete_run_record("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_run_delete_is_idempotent_and_still_fetchable() {
        let store = MemoryTrackingStore::new();
        store.add_run(run("r1", "7"));

        store.delete_run_record("r1").await.unwrap();
        store.delete_run_record("r1").await.unwrap();

        let fetched = store.fetch_run("r1").await.unwrap();
        assert_eq!(fetched.lifecycle_stage(), LifecycleStage::Deleted);
        assert!(store.search_runs_by_experiment("7").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_experiment_delete_is_remote_error() {
        let store = MemoryTrackingStore::new();
        store.add_experiment("7");
        store.delete_experiment_record("7").await.unwrap();

        let err = store.delete_experiment_record("7").await.unwrap_err();
        assert!(matches!(err, Error::Remote { ref error_code, .. } if error_code == INVALID_PARAMETER_VALUE));
    }

    #[tokio::test]
    async fn test_experiment_delete_does_not_touch_runs() {
        let store = MemoryTrackingStore::new();
        store.add_run(run("r1", "7"));
        store.delete_experiment_record("7").await.unwrap();

        assert_eq!(store.search_runs_by_experiment("7").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_run() {
        let store = MemoryTrackingStore::new();
        store.add_run(run("r1", "7"));
        store.reject_run_deletes("r1");

        assert!(store.delete_run_record("r1").await.is_err());
        assert_eq!(
            store.run("r1").unwrap().lifecycle_stage(),
            LifecycleStage::Active
        );
    }
}
