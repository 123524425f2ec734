//! Cascade Orchestrator - deletes experiments and runs together with their artifacts
//!
//! ## Ordering
//!
//! ```text
//! delete_run(id, artifacts?)
//!    deleteRunRecord ──> [fetchRun ──> artifact delete(run path)]
//!
//! delete_experiment(id, artifacts?)
//!    deleteExperimentRecord ──> searchRuns ──> delete_run(r, false) for each r
//!                                          └─> [artifact delete(experiment root)]
//! ```
//!
//! Metadata is always deleted before artifacts. A failure in between can
//! orphan blobs but never removes artifacts of a record that still exists.

use tracing::{debug, info, warn};

use crate::artifact::{experiment_artifact_root, run_artifact_path, ArtifactStore};
use crate::config::TrackingConfig;
use crate::tracking::{HttpMetadataGateway, MetadataGateway};
use crate::{Error, Result};

/// A run that could not be deleted during an experiment cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    run_id: String,
    error: Error,
}

impl RunFailure {
    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the error that stopped this run's deletion.
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.error
    }
}

/// Outcome of a successful `delete_experiment`.
///
/// Run-level failures do not fail the experiment cascade; they are kept
/// here, separate from the runs that were deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentDeletion {
    experiment_id: String,
    deleted_runs: Vec<String>,
    failed_runs: Vec<RunFailure>,
    artifact_root: Option<String>,
}

impl ExperimentDeletion {
    fn new(experiment_id: &str) -> Self {
        Self {
            experiment_id: experiment_id.to_string(),
            deleted_runs: Vec::new(),
            failed_runs: Vec::new(),
            artifact_root: None,
        }
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Runs whose records were deleted, in search order.
    #[must_use]
    pub fn deleted_runs(&self) -> &[String] {
        &self.deleted_runs
    }

    /// Runs whose deletion failed, in search order.
    #[must_use]
    pub fn failed_runs(&self) -> &[RunFailure] {
        &self.failed_runs
    }

    /// Artifact prefix that was deleted, if any.
    #[must_use]
    pub fn artifact_root(&self) -> Option<&str> {
        self.artifact_root.as_deref()
    }

    /// True when every run was deleted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_runs.is_empty()
    }
}

/// Orchestrates cascading deletes over a metadata gateway and an artifact store.
///
/// Holds no state between calls; concurrent callers are not coordinated.
///
/// # Example
///
/// ```rust
/// use mlflow_cascade::artifact::MemoryArtifactStore;
/// use mlflow_cascade::cascade::CascadeDeleter;
/// use mlflow_cascade::tracking::{MemoryTrackingStore, RunSummary};
///
/// # async fn example() -> mlflow_cascade::Result<()> {
/// let tracking = MemoryTrackingStore::new();
/// tracking.add_run(RunSummary::new("r1", "7", "gs://bucket/mlflow/7/r1/artifacts"));
///
/// let artifacts = MemoryArtifactStore::new();
/// artifacts.put("bucket/mlflow/7/r1/artifacts/model.pkl", vec![1, 2, 3]);
///
/// let deleter = CascadeDeleter::new(tracking, artifacts);
/// let report = deleter.delete_experiment("7", true).await?;
///
/// assert_eq!(report.deleted_runs(), ["r1"]);
/// assert_eq!(report.artifact_root(), Some("bucket/mlflow/7"));
/// assert!(deleter.artifacts().is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CascadeDeleter<G, A> {
    gateway: G,
    artifacts: A,
}

impl<A: ArtifactStore> CascadeDeleter<HttpMetadataGateway, A> {
    /// Create a deleter talking to the configured tracking server.
    #[must_use]
    pub fn from_config(config: &TrackingConfig, artifacts: A) -> Self {
        Self::new(HttpMetadataGateway::new(config.clone()), artifacts)
    }
}

impl<G: MetadataGateway, A: ArtifactStore> CascadeDeleter<G, A> {
    /// Create a deleter from injected capabilities.
    #[must_use]
    pub const fn new(gateway: G, artifacts: A) -> Self {
        Self { gateway, artifacts }
    }

    /// Get the metadata gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Get the artifact store.
    #[must_use]
    pub const fn artifacts(&self) -> &A {
        &self.artifacts
    }

    /// Delete a run record and, optionally, its artifact root.
    ///
    /// The artifact URI is fetched by id after the record deletion succeeded.
    ///
    /// # Errors
    ///
    /// Fails if the record deletion fails (nothing else is attempted), or, when
    /// `delete_artifact` is set, if the fetch, path derivation or artifact
    /// deletion fails. The record stays deleted in the latter cases.
    #[tracing::instrument(skip(self))]
    pub async fn delete_run(&self, run_id: &str, delete_artifact: bool) -> Result<()> {
        self.gateway.delete_run_record(run_id).await?;
        if !delete_artifact {
            return Ok(());
        }

        let run = self.gateway.fetch_run(run_id).await?;
        let path = run_artifact_path(run.artifact_uri())?;
        self.artifacts.delete_prefix(path).await?;
        debug!(path, "run artifacts deleted");
        Ok(())
    }

    /// Delete an experiment record, every run it holds and, optionally, the
    /// experiment's artifact root.
    ///
    /// Runs are deleted sequentially in search order without their own
    /// artifacts; a failing run is recorded and the loop moves on. When
    /// `delete_artifact` is set and at least one run existed, a single prefix
    /// delete is issued for the root derived from the first run's URI.
    ///
    /// # Errors
    ///
    /// Fails if the experiment record deletion or the run search fails. If the
    /// artifact root cannot be derived or its deletion fails, returns
    /// `Error::PartialCascade` carrying the run outcomes. Individual run
    /// failures are otherwise reported in the returned `ExperimentDeletion`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_experiment(
        &self,
        experiment_id: &str,
        delete_artifact: bool,
    ) -> Result<ExperimentDeletion> {
        self.gateway.delete_experiment_record(experiment_id).await?;
        let runs = self.gateway.search_runs_by_experiment(experiment_id).await?;

        let mut report = ExperimentDeletion::new(experiment_id);
        for run in &runs {
            match self.delete_run(run.run_id(), false).await {
                Ok(()) => report.deleted_runs.push(run.run_id().to_string()),
                Err(error) => {
                    warn!(run_id = run.run_id(), %error, "run deletion failed, continuing cascade");
                    report.failed_runs.push(RunFailure {
                        run_id: run.run_id().to_string(),
                        error,
                    });
                }
            }
        }

        if delete_artifact {
            if let Some(first) = runs.first() {
                match self.delete_experiment_artifacts(first.artifact_uri()).await {
                    Ok(root) => report.artifact_root = Some(root),
                    Err(source) => {
                        warn!(%source, "experiment artifact cleanup failed after run cascade");
                        return Err(Error::PartialCascade {
                            deletion: Box::new(report),
                            source: Box::new(source),
                        })
                    }
                }
            }
        }

        info!(
            deleted = report.deleted_runs.len(),
            failed = report.failed_runs.len(),
            artifact_root = report.artifact_root(),
            "experiment cascade finished"
        );
        Ok(report)
    }

    async fn delete_experiment_artifacts(&self, artifact_uri: &str) -> Result<String> {
        let root = experiment_artifact_root(artifact_uri)?;
        self.artifacts.delete_prefix(&root).await?;
        Ok(root)
    }
}
