//! Fetch metrics collaborators
//!
//! Metrics are informational only; implementations must not fail or block
//! the fetch they describe.

use crate::error::FetchError;
use tracing::info;

/// Receives start/finish notifications for each fetch
pub trait FetchMetrics: Send + Sync {
    fn clone_started(&self, repo_url: &str);

    fn clone_finished(&self, repo_url: &str, error: Option<&FetchError>);
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl FetchMetrics for NoopMetrics {
    fn clone_started(&self, _repo_url: &str) {}

    fn clone_finished(&self, _repo_url: &str, _error: Option<&FetchError>) {}
}

/// Emits notifications as `tracing` events under the `scaffold::metrics` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetrics;

impl FetchMetrics for TracingMetrics {
    fn clone_started(&self, repo_url: &str) {
        info!(target: "scaffold::metrics", repo_url, "clone started");
    }

    fn clone_finished(&self, repo_url: &str, error: Option<&FetchError>) {
        match error {
            None => info!(target: "scaffold::metrics", repo_url, outcome = "success", "clone finished"),
            Some(error) if error.is_cancelled() => {
                info!(target: "scaffold::metrics", repo_url, outcome = "cancelled", "clone finished")
            }
            Some(error) => info!(
                target: "scaffold::metrics",
                repo_url,
                outcome = "failure",
                phase = ?error.phase(),
                error = %error,
                "clone finished"
            ),
        }
    }
}
