//! Error types for mlflow-cascade
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

use crate::cascade::ExperimentDeletion;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error code the tracking server returns for unknown experiments and runs.
pub const RESOURCE_DOES_NOT_EXIST: &str = "RESOURCE_DOES_NOT_EXIST";

/// Cascade deletion error types
///
/// All payloads are plain strings so errors can be collected by value
/// (e.g. the per-run failure set of an experiment cascade).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Network, connection or decoding failure talking to the tracking server
    #[error("Transport error: {0}")]
    Transport(String),

    /// Structured application error returned by the tracking server
    ///
    /// If the server's error body has an empty `message`, the HTTP gateway
    /// substitutes `"tracking server returned <status>"`.
    #[error("{message}")]
    Remote {
        /// Server error code (e.g. `RESOURCE_DOES_NOT_EXIST`)
        error_code: String,
        /// Server message, verbatim
        message: String,
    },

    /// Artifact URI does not follow the `scheme://bucket/experiment/run/...` convention
    #[error("Malformed artifact path: {0}")]
    ArtifactPath(String),

    /// Artifact store collaborator failed to delete a path
    #[error("Artifact store error: {0}")]
    ArtifactStore(String),

    /// Experiment artifact cleanup failed after the run cascade already ran
    ///
    /// `deletion` holds the run outcomes; `source` is the artifact failure
    /// (`ArtifactPath` or `ArtifactStore`).
    #[error("Experiment cascade incomplete: {source}")]
    PartialCascade {
        /// Run outcomes gathered before the artifact step failed
        deletion: Box<ExperimentDeletion>,
        /// The artifact error that stopped the cascade
        source: Box<Error>,
    },

    /// Missing or invalid tracking server configuration
    #[error("Configuration error: {0}\nSet MLFLOW_TRACKING_URL to an http(s) URL")]
    Configuration(String),
}

impl Error {
    /// Build a `Remote` error from a server error body.
    #[must_use]
    pub fn remote(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            error_code: error_code.into(),
            message: message.into(),
        }
    }

    /// Run outcomes of an experiment cascade whose artifact step failed.
    #[must_use]
    pub fn partial_deletion(&self) -> Option<&ExperimentDeletion> {
        match self {
            Self::PartialCascade { deletion, .. } => Some(deletion),
            _ => None,
        }
    }

    /// The innermost error, unwrapping `PartialCascade`.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::PartialCascade { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// True if the tracking server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { error_code, .. } if error_code == RESOURCE_DOES_NOT_EXIST)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("invalid JSON: {err}"))
    }
}
