//! Artifact path derivation from scheme-qualified artifact URIs.
//!
//! ```text
//! gs://bucket/mlflow/7/abc123/artifacts
//! └──┘└──────────────────────────────┘  run artifact path   (scheme prefix stripped)
//!     └───────────────┘                 experiment root     (first three segments)
//! ```

use crate::{Error, Result};

/// Length of the scheme prefix stripped from artifact URIs (`gs://`, `s3://`).
pub const SCHEME_PREFIX_LEN: usize = 5;

/// Number of leading path segments forming an experiment's artifact root.
pub const EXPERIMENT_ROOT_SEGMENTS: usize = 3;

/// Strip the scheme prefix and check the `bucket/prefix/experiment/run...` shape.
///
/// Returns the stripped path and its split at the experiment root.
fn split_artifact_uri(artifact_uri: &str) -> Result<(&str, [&str; EXPERIMENT_ROOT_SEGMENTS])> {
    let path = artifact_uri.get(SCHEME_PREFIX_LEN..).ok_or_else(|| {
        Error::ArtifactPath(format!(
            "{artifact_uri:?} is shorter than the {SCHEME_PREFIX_LEN}-character scheme prefix"
        ))
    })?;

    let segments: Vec<&str> = path.splitn(EXPERIMENT_ROOT_SEGMENTS + 1, '/').collect();
    let [bucket, prefix, experiment, rest] = segments[..] else {
        return Err(Error::ArtifactPath(format!(
            "{artifact_uri:?} needs at least {} path segments after the scheme prefix",
            EXPERIMENT_ROOT_SEGMENTS + 1
        )));
    };

    if bucket.is_empty() || prefix.is_empty() || experiment.is_empty() {
        return Err(Error::ArtifactPath(format!(
            "{artifact_uri:?} has an empty segment in its experiment root"
        )));
    }
    // A run path equal to the experiment root would wipe sibling runs.
    if rest.trim_matches('/').is_empty() {
        return Err(Error::ArtifactPath(format!(
            "{artifact_uri:?} has no run segment below the experiment root"
        )));
    }
    Ok((path, [bucket, prefix, experiment]))
}

/// Storage-relative path of a run's artifact root.
///
/// # Errors
///
/// Returns `Error::ArtifactPath` if the URI is shorter than the scheme prefix,
/// has fewer than four segments after it, has an empty segment among the
/// first three, or stops at the experiment root.
pub fn run_artifact_path(artifact_uri: &str) -> Result<&str> {
    split_artifact_uri(artifact_uri).map(|(path, _)| path)
}

/// Experiment artifact root shared by all runs of the experiment.
///
/// Takes the first three `/`-separated segments of the run artifact path.
///
/// # Errors
///
/// Same conditions as [`run_artifact_path`].
pub fn experiment_artifact_root(artifact_uri: &str) -> Result<String> {
    split_artifact_uri(artifact_uri).map(|(_, root)| root.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_path_strips_scheme() {
        assert_eq!(
            run_artifact_path("gs://bucket/mlflow/7/abc/artifacts").unwrap(),
            "bucket/mlflow/7/abc/artifacts"
        );
    }

    #[test]
    fn test_run_path_rejects_bucket_level_uris() {
        for uri in ["gs://bucket", "s3://b/x", "gs://bucket/mlflow/7", "gs://bucket/mlflow/7/"] {
            assert!(
                matches!(run_artifact_path(uri), Err(Error::ArtifactPath(_))),
                "{uri:?}"
            );
        }
    }

    #[test]
    fn test_run_path_rejects_empty_root_segments() {
        assert!(run_artifact_path("gs://bucket//7/abc").is_err());
        assert!(run_artifact_path("gs:///mlflow/7/abc").is_err());
    }

    #[test]
    fn test_run_path_too_short() {
        for uri in ["", "gs:", "gs:/", "gs://", "gs:///"] {
            assert!(
                matches!(run_artifact_path(uri), Err(Error::ArtifactPath(_))),
                "{uri:?}"
            );
        }
    }

    #[test]
    fn test_run_path_non_char_boundary() {
        // 'é' spans bytes 4..6, so byte 5 is not a boundary.
        assert!(matches!(
            run_artifact_path("abcdé/x/y/z"),
            Err(Error::ArtifactPath(_))
        ));
    }

    #[test]
    fn test_experiment_root() {
        assert_eq!(
            experiment_artifact_root("gs://bucket/mlflow/7/abc/artifacts").unwrap(),
            "bucket/mlflow/7"
        );
        assert_eq!(
            experiment_artifact_root("gs://bucket/mlflow/7/abc").unwrap(),
            "bucket/mlflow/7"
        );
    }

    #[test]
    fn test_experiment_root_needs_four_segments() {
        for uri in ["gs://bucket/mlflow/7", "gs://bucket/mlflow", "gs://bucket"] {
            assert!(
                matches!(experiment_artifact_root(uri), Err(Error::ArtifactPath(_))),
                "{uri:?}"
            );
        }
    }

    #[test]
    fn test_experiment_root_rejects_empty_segments() {
        assert!(experiment_artifact_root("gs:///mlflow/7/abc").is_err());
        assert!(experiment_artifact_root("gs://bucket//7/abc").is_err());
    }
}
