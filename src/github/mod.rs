//! Upstream provider of raw activity data.
//!
//! The aggregation pipeline only sees [`StatsProvider`]; [`GithubClient`] is
//! the implementation backed by the GitHub GraphQL and search APIs.

mod client;
mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RawStats;

pub use client::{GithubClient, DEFAULT_API_URL};

#[async_trait]
pub trait StatsProvider: Send + Sync + 'static {
    /// Fetch the user's repositories and activity counts.
    ///
    /// Fails with `UserNotFound` when the account does not exist and with
    /// `UpstreamUnavailable` on transport or decode errors.
    async fn fetch_raw_stats(&self, username: &str, include_orgs: bool) -> Result<RawStats>;
}

/// Result of one counting sub-query.
///
/// A failed count degrades to zero instead of failing the whole fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    Counted(u64),
    Degraded(String),
}

impl CountOutcome {
    pub fn value(&self) -> u64 {
        match self {
            CountOutcome::Counted(count) => *count,
            CountOutcome::Degraded(_) => 0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, CountOutcome::Degraded(_))
    }
}

impl<E: std::fmt::Display> From<std::result::Result<u64, E>> for CountOutcome {
    fn from(result: std::result::Result<u64, E>) -> Self {
        match result {
            Ok(count) => CountOutcome::Counted(count),
            Err(err) => CountOutcome::Degraded(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    #[test]
    fn test_degraded_count_is_zero() {
        let failed: std::result::Result<u64, StatsError> =
            Err(StatsError::UpstreamUnavailable("rate limited".to_string()));
        let outcome = CountOutcome::from(failed);

        assert!(outcome.is_degraded());
        assert_eq!(outcome.value(), 0);
        assert_eq!(CountOutcome::from(Ok::<u64, StatsError>(42)).value(), 42);
    }
}
