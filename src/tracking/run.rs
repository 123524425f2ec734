//! Run Summary - the slice of a tracking-server run needed to drive deletion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a run or experiment on the tracking server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    /// Visible to default searches.
    #[default]
    Active,
    /// Soft-deleted; still fetchable by id.
    Deleted,
    /// Any stage string this crate does not recognise.
    #[serde(other)]
    Unknown,
}

/// A `key`/`value` tag attached to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTag {
    key: String,
    value: String,
}

impl RunTag {
    /// Create a new tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the tag key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the tag value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Run Summary as returned by search and get.
///
/// Carries the run identifier, its parent experiment and the artifact URI,
/// which is everything the cascade needs without a second fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    run_id: String,
    experiment_id: String,
    user_id: String,
    lifecycle_stage: LifecycleStage,
    artifact_uri: String,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    tags: Vec<RunTag>,
}

impl RunSummary {
    /// Create an active run summary.
    ///
    /// # Arguments
    ///
    /// * `run_id` - Unique identifier for the run
    /// * `experiment_id` - ID of the parent experiment
    /// * `artifact_uri` - Scheme-qualified artifact root (e.g. `gs://bucket/mlflow/1/abc/artifacts`)
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        experiment_id: impl Into<String>,
        artifact_uri: impl Into<String>,
    ) -> Self {
        RunSummaryBuilder::new(run_id, experiment_id, artifact_uri).build()
    }

    /// Create a builder for constructing a run summary with optional fields.
    #[must_use]
    pub fn builder(
        run_id: impl Into<String>,
        experiment_id: impl Into<String>,
        artifact_uri: impl Into<String>,
    ) -> RunSummaryBuilder {
        RunSummaryBuilder::new(run_id, experiment_id, artifact_uri)
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the parent experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the user that created the run (empty if unknown).
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Get the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(&self) -> LifecycleStage {
        self.lifecycle_stage
    }

    /// Get the scheme-qualified artifact URI.
    #[must_use]
    pub fn artifact_uri(&self) -> &str {
        &self.artifact_uri
    }

    /// Get the start timestamp, if reported.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Get the end timestamp, if the run finished.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Get all tags.
    #[must_use]
    pub fn tags(&self) -> &[RunTag] {
        &self.tags
    }

    /// Look up a tag value by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key() == key)
            .map(RunTag::value)
    }

    /// Soft-delete the run, as the tracking server does on `runs/delete`.
    pub fn mark_deleted(&mut self) {
        self.lifecycle_stage = LifecycleStage::Deleted;
    }
}

/// Builder for `RunSummary`.
#[derive(Debug)]
pub struct RunSummaryBuilder {
    run: RunSummary,
}

impl RunSummaryBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        experiment_id: impl Into<String>,
        artifact_uri: impl Into<String>,
    ) -> Self {
        Self {
            run: RunSummary {
                run_id: run_id.into(),
                experiment_id: experiment_id.into(),
                user_id: String::new(),
                lifecycle_stage: LifecycleStage::Active,
                artifact_uri: artifact_uri.into(),
                start_time: None,
                end_time: None,
                tags: Vec::new(),
            },
        }
    }

    /// Set the creating user.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.run.user_id = user_id.into();
        self
    }

    /// Set the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(mut self, stage: LifecycleStage) -> Self {
        self.run.lifecycle_stage = stage;
        self
    }

    /// Set the start timestamp.
    #[must_use]
    pub const fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.run.start_time = Some(start_time);
        self
    }

    /// Set the end timestamp.
    #[must_use]
    pub const fn end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.run.end_time = Some(end_time);
        self
    }

    /// Append a tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.run.tags.push(RunTag::new(key, value));
        self
    }

    /// Build the `RunSummary`.
    #[must_use]
    pub fn build(self) -> RunSummary {
        self.run
    }
}
