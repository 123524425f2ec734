//! Tracking server configuration

use crate::{Error, Result};

/// Environment variable holding the tracking server base URL.
pub const TRACKING_URL_ENV: &str = "MLFLOW_TRACKING_URL";

/// Location of the tracking server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingConfig {
    tracking_url: String,
}

impl TrackingConfig {
    /// Create a builder for the given tracking server base URL.
    #[must_use]
    pub fn builder(tracking_url: impl Into<String>) -> TrackingConfigBuilder {
        TrackingConfigBuilder::new(tracking_url)
    }

    /// Load the configuration from `MLFLOW_TRACKING_URL`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the variable is unset, empty or not an http(s) URL.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(TRACKING_URL_ENV)
            .map_err(|_| Error::Configuration(format!("{TRACKING_URL_ENV} is not set")))?;
        Self::builder(url).build()
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn tracking_url(&self) -> &str {
        &self.tracking_url
    }

    /// Join an API path (starting with `/`) onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.tracking_url)
    }
}

/// Builder for `TrackingConfig`.
#[derive(Debug)]
pub struct TrackingConfigBuilder {
    tracking_url: String,
}

impl TrackingConfigBuilder {
    /// Create a new builder with the required base URL.
    #[must_use]
    pub fn new(tracking_url: impl Into<String>) -> Self {
        Self {
            tracking_url: tracking_url.into(),
        }
    }

    /// Validate and build the `TrackingConfig`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the URL is empty, unparsable or not http(s).
    pub fn build(self) -> Result<TrackingConfig> {
        let trimmed = self.tracking_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Configuration("tracking URL is empty".into()));
        }

        let parsed = reqwest::Url::parse(trimmed)
            .map_err(|e| Error::Configuration(format!("invalid tracking URL {trimmed:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "unsupported tracking URL scheme {:?}",
                parsed.scheme()
            )));
        }

        Ok(TrackingConfig {
            tracking_url: trimmed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = TrackingConfig::builder("http://mlflow.local:5000/")
            .build()
            .unwrap();
        assert_eq!(config.tracking_url(), "http://mlflow.local:5000");
        assert_eq!(
            config.endpoint("/api/2.0/mlflow/runs/delete"),
            "http://mlflow.local:5000/api/2.0/mlflow/runs/delete"
        );
    }

    #[test]
    fn test_path_prefix_preserved() {
        let config = TrackingConfig::builder("https://gw.example.com/mlflow")
            .build()
            .unwrap();
        assert_eq!(
            config.endpoint("/api/2.0/mlflow/runs/get"),
            "https://gw.example.com/mlflow/api/2.0/mlflow/runs/get"
        );
    }

    #[test]
    fn test_rejects_empty_and_bad_urls() {
        for url in ["", "   ", "/", "not a url", "ftp://host/"] {
            let err = TrackingConfig::builder(url).build().unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{url:?} -> {err:?}");
        }
    }
}
