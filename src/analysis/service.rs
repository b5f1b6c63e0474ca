use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::aggregate::aggregate;
use super::cache::{RawStatsCache, StatsCache};
use crate::error::{Result, StatsError};
use crate::github::StatsProvider;
use crate::types::{CacheKey, FetchKey, FilterConfig, StatsResult};

/// Default bound on one upstream fetch
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// The end-to-end "get stats for a user" path: result cache lookup, then the
/// shared upstream fetch on a miss, aggregation and store.
///
/// Raw upstream data is cached per user and organization setting, so every
/// filter shape for that user reuses one fetch.
#[derive(Clone)]
pub struct StatsService {
    provider: Arc<dyn StatsProvider>,
    cache: StatsCache,
    raw_cache: RawStatsCache,
    upstream_timeout: Duration,
}

impl StatsService {
    /// The raw data cache is created with the same bounds as `cache`
    pub fn new(provider: Arc<dyn StatsProvider>, cache: StatsCache) -> Self {
        let raw_cache = RawStatsCache::new(cache.options());
        Self {
            provider,
            cache,
            raw_cache,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn cache(&self) -> &StatsCache {
        &self.cache
    }

    pub fn raw_cache(&self) -> &RawStatsCache {
        &self.raw_cache
    }

    /// Statistics for `username` under `filter`, computed at most once per
    /// distinct request shape.
    pub async fn get_stats(&self, username: &str, filter: &FilterConfig) -> Result<Arc<StatsResult>> {
        let key = CacheKey::new(username, filter);
        let fetch_key = FetchKey::from(&key);
        let provider = Arc::clone(&self.provider);
        let raw_cache = self.raw_cache.clone();
        let filter = filter.clone();
        let timeout = self.upstream_timeout;

        self.cache
            .get_or_compute(key, move || async move {
                let login = fetch_key.username.clone();
                let username = login.clone();
                let include_orgs = fetch_key.include_orgs;
                let raw = raw_cache
                    .get_or_compute(fetch_key, move || async move {
                        tokio::time::timeout(timeout, provider.fetch_raw_stats(&username, include_orgs))
                            .await
                            .map_err(|_| StatsError::Timeout(timeout))?
                    })
                    .await?;

                let stats = aggregate(&raw, &filter);
                info!(
                    username = %login,
                    repositories = raw.repositories.len(),
                    languages = stats.languages.len(),
                    "computed stats"
                );
                Ok(stats)
            })
            .await
    }
}
