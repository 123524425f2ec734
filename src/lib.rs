//! # mlflow-cascade: Cascading Deletion for Experiment Tracking
//!
//! Deletes experiments and runs from an MLflow-compatible tracking server
//! together with the artifact blobs they reference.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke**: metadata is deleted before artifacts, so a partial failure
//!   can orphan blobs but never strand a record without its artifacts
//! - **Jidoka**: a failing metadata mutation stops the cascade immediately
//! - **Genchi Genbutsu**: artifact URIs are fetched after deletion, never cached
//! - **Heijunka**: one bad run does not block the cleanup of its siblings
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mlflow_cascade::artifact::MemoryArtifactStore;
//! use mlflow_cascade::cascade::CascadeDeleter;
//! use mlflow_cascade::config::TrackingConfig;
//!
//! # async fn example() -> mlflow_cascade::Result<()> {
//! let config = TrackingConfig::from_env()?;
//! let deleter = CascadeDeleter::from_config(&config, MemoryArtifactStore::new());
//!
//! let report = deleter.delete_experiment("42", true).await?;
//! for failure in report.failed_runs() {
//!     eprintln!("run {} not deleted: {}", failure.run_id(), failure.error());
//! }
//!
//! deleter.delete_run("0f3c9a", true).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod artifact;
pub mod cascade;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracking;

pub use artifact::ArtifactStore;
pub use cascade::{CascadeDeleter, ExperimentDeletion, RunFailure};
pub use config::TrackingConfig;
pub use error::{Error, Result};
pub use tracking::{MetadataGateway, RunSummary};
