//! Tracking server JSON payloads (`/api/2.0/mlflow/...`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::run::{LifecycleStage, RunSummary, RunTag};

#[derive(Debug, Serialize)]
pub(crate) struct DeleteExperimentRequest<'a> {
    pub experiment_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRunRequest<'a> {
    pub run_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRunsRequest<'a> {
    pub experiment_ids: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRunsResponse {
    /// Omitted by the server when no run matches.
    #[serde(default)]
    pub runs: Vec<RunPayload>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetRunResponse {
    pub run: RunPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunPayload {
    pub info: RunInfoPayload,
    #[serde(default)]
    pub data: RunDataPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunInfoPayload {
    pub run_id: String,
    pub experiment_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub lifecycle_stage: LifecycleStage,
    #[serde(default)]
    pub artifact_uri: String,
    #[serde(default)]
    pub start_time: Option<EpochMillis>,
    #[serde(default)]
    pub end_time: Option<EpochMillis>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RunDataPayload {
    #[serde(default)]
    pub tags: Vec<RunTag>,
}

/// int64 fields arrive either as JSON numbers or as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EpochMillis {
    Number(i64),
    Text(String),
}

impl EpochMillis {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let millis = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.parse().ok()?,
        };
        DateTime::from_timestamp_millis(millis)
    }
}

impl From<RunPayload> for RunSummary {
    fn from(payload: RunPayload) -> Self {
        let info = payload.info;
        let mut builder = Self::builder(info.run_id, info.experiment_id, info.artifact_uri)
            .user_id(info.user_id)
            .lifecycle_stage(info.lifecycle_stage);

        if let Some(start) = info.start_time.as_ref().and_then(EpochMillis::to_datetime) {
            builder = builder.start_time(start);
        }
        if let Some(end) = info.end_time.as_ref().and_then(EpochMillis::to_datetime) {
            builder = builder.end_time(end);
        }
        for tag in payload.data.tags {
            builder = builder.tag(tag.key(), tag.value());
        }

        builder.build()
    }
}
