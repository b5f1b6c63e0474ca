use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

/// Failures of the stats pipeline.
///
/// `Clone` because one failed computation is handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("User not found: {0}")]
    UserNotFound(String),
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Upstream timed out after {0:?}")]
    Timeout(Duration),
}

impl StatsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::UserNotFound(_))
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        StatsError::UpstreamUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::UpstreamUnavailable(format!("invalid upstream payload: {err}"))
    }
}

impl From<tokio::task::JoinError> for StatsError {
    fn from(err: tokio::task::JoinError) -> Self {
        StatsError::UpstreamUnavailable(format!("stats computation aborted: {err}"))
    }
}
