//! Metadata Gateway - the tracking server operations the cascade consumes
//!
//! Exactly four calls are needed: delete an experiment record, delete a run
//! record, enumerate the runs of an experiment, and fetch one run.
//!
//! ## Backends
//!
//! ```text
//! MetadataGateway
//!    ├── HttpMetadataGateway   (POST/GET {base}/api/2.0/mlflow/...)
//!    └── MemoryTrackingStore   (in-process, for tests and demos)
//! ```
//!
//! # Example
//!
//! ```rust
//! use mlflow_cascade::tracking::{MemoryTrackingStore, MetadataGateway, RunSummary};
//!
//! # async fn example() -> mlflow_cascade::Result<()> {
//! let store = MemoryTrackingStore::new();
//! store.add_run(RunSummary::new("run-1", "7", "gs://bucket/mlflow/7/run-1/artifacts"));
//!
//! let runs = store.search_runs_by_experiment("7").await?;
//! assert_eq!(runs.len(), 1);
//!
//! store.delete_run_record("run-1").await?;
//! assert!(store.search_runs_by_experiment("7").await?.is_empty());
//! # Ok(())
//! # }
//! ```

mod http;
mod memory;
mod run;
mod wire;

pub use http::{
    HttpMetadataGateway, DELETE_EXPERIMENT_PATH, DELETE_RUN_PATH, GET_RUN_PATH, SEARCH_RUNS_PATH,
};
pub use memory::MemoryTrackingStore;
pub use run::{LifecycleStage, RunSummary, RunSummaryBuilder, RunTag};

use crate::Result;
use std::future::Future;

/// Capability set over a tracking server.
///
/// Implementations map non-success responses to `Error::Remote` and
/// connection or decoding failures to `Error::Transport`. No retries or
/// timeouts are applied at this layer.
pub trait MetadataGateway: Send + Sync {
    /// Mark an experiment deleted. Runs are NOT cascaded by the server.
    fn delete_experiment_record(&self, experiment_id: &str)
        -> impl Future<Output = Result<()>> + Send;

    /// Mark a single run deleted.
    fn delete_run_record(&self, run_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// All runs belonging to an experiment, in server order.
    ///
    /// Returns an empty vector if the experiment has no runs.
    fn search_runs_by_experiment(
        &self,
        experiment_id: &str,
    ) -> impl Future<Output = Result<Vec<RunSummary>>> + Send;

    /// Fetch one run by id.
    fn fetch_run(&self, run_id: &str) -> impl Future<Output = Result<RunSummary>> + Send;
}
