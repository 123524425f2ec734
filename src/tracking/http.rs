//! HTTP+JSON gateway to an MLflow-compatible tracking server.

use std::collections::HashSet;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::wire::{
    DeleteExperimentRequest, DeleteRunRequest, ErrorResponse, GetRunResponse, SearchRunsRequest,
    SearchRunsResponse,
};
use super::{MetadataGateway, RunSummary};
use crate::config::TrackingConfig;
use crate::{Error, Result};

/// `POST` endpoint marking an experiment deleted.
pub const DELETE_EXPERIMENT_PATH: &str = "/api/2.0/mlflow/experiments/delete";
/// `POST` endpoint marking a run deleted.
pub const DELETE_RUN_PATH: &str = "/api/2.0/mlflow/runs/delete";
/// `POST` endpoint searching runs.
pub const SEARCH_RUNS_PATH: &str = "/api/2.0/mlflow/runs/search";
/// `GET` endpoint fetching a run by `run_id`.
pub const GET_RUN_PATH: &str = "/api/2.0/mlflow/runs/get";

const APPLICATION_JSON: &str = "application/json";

/// Metadata gateway speaking the tracking server REST API.
///
/// Timeouts, proxies and TLS settings belong to the injected `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpMetadataGateway {
    client: Client,
    config: TrackingConfig,
}

impl HttpMetadataGateway {
    /// Create a gateway with a default `reqwest::Client`.
    #[must_use]
    pub fn new(config: TrackingConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a gateway around a caller-configured client.
    #[must_use]
    pub const fn with_client(client: Client, config: TrackingConfig) -> Self {
        Self { client, config }
    }

    /// Get the tracking server configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackingConfig {
        &self.config
    }

    fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<RequestBuilder> {
        let body = serde_json::to_vec(body)?;
        Ok(self
            .client
            .post(self.config.endpoint(path))
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(body))
    }

    /// Send a request; any status outside `[200, 300)` becomes `Error::Remote`.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        debug!(method = %request.method(), path = request.url().path(), "tracking request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        let error: ErrorResponse = serde_json::from_slice(&body).map_err(|e| {
            Error::Transport(format!("undecodable error body (status={status}): {e}"))
        })?;
        let message = if error.message.is_empty() {
            format!("tracking server returned {status}")
        } else {
            error.message
        };
        Err(Error::remote(error.error_code, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl MetadataGateway for HttpMetadataGateway {
    async fn delete_experiment_record(&self, experiment_id: &str) -> Result<()> {
        let request =
            self.post_json(DELETE_EXPERIMENT_PATH, &DeleteExperimentRequest { experiment_id })?;
        self.send(request).await?;
        Ok(())
    }

    async fn delete_run_record(&self, run_id: &str) -> Result<()> {
        let request = self.post_json(DELETE_RUN_PATH, &DeleteRunRequest { run_id })?;
        self.send(request).await?;
        Ok(())
    }

    async fn search_runs_by_experiment(&self, experiment_id: &str) -> Result<Vec<RunSummary>> {
        let mut runs = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens: HashSet<String> = HashSet::new();

        loop {
            let body = SearchRunsRequest {
                experiment_ids: [experiment_id],
                page_token: page_token.as_deref(),
            };
            let response = self.send(self.post_json(SEARCH_RUNS_PATH, &body)?).await?;
            let page: SearchRunsResponse = Self::decode(response).await?;
            runs.extend(page.runs.into_iter().map(RunSummary::from));

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        return Err(Error::Transport(format!(
                            "search for experiment {experiment_id} repeated page token {token:?}"
                        )));
                    }
                    page_token = Some(token);
                }
                _ => return Ok(runs),
            }
        }
    }

    async fn fetch_run(&self, run_id: &str) -> Result<RunSummary> {
        let request = self
            .client
            .get(self.config.endpoint(GET_RUN_PATH))
            .query(&[("run_id", run_id)])
            .header(CONTENT_TYPE, APPLICATION_JSON);
        let response = self.send(request).await?;
        let payload: GetRunResponse = Self::decode(response).await?;
        Ok(payload.run.into())
    }
}
