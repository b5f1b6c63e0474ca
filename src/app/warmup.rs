use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::analysis::StatsService;
use crate::config::DEFAULT_WARMUP_INTERVAL_MS;
use crate::types::FilterConfig;

/// Which users to pre-populate the cache for, and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmupConfig {
    pub usernames: Vec<String>,
    pub include_orgs: bool,
    pub interval: Duration,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            usernames: Vec::new(),
            include_orgs: false,
            interval: Duration::from_millis(DEFAULT_WARMUP_INTERVAL_MS),
        }
    }
}

/// Outcome of one warmup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmupSummary {
    pub warmed: usize,
    pub failed: usize,
}

/// Populates the stats cache for a fixed list of users, once at startup and
/// then on a recurring interval.
#[derive(Clone)]
pub struct CacheWarmup {
    service: StatsService,
    config: WarmupConfig,
}

impl CacheWarmup {
    pub fn new(service: StatsService, config: WarmupConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &WarmupConfig {
        &self.config
    }

    /// Warm every configured user, one at a time.
    ///
    /// A failure for one user is logged and the pass moves on to the next.
    pub async fn run_once(&self) -> WarmupSummary {
        let mut summary = WarmupSummary::default();
        if self.config.usernames.is_empty() {
            return summary;
        }

        let filter = FilterConfig::unfiltered(self.config.include_orgs);
        info!(users = self.config.usernames.len(), "starting cache warmup");

        for username in &self.config.usernames {
            match self.service.get_stats(username, &filter).await {
                Ok(_) => {
                    info!(username = %username, "warmed stats cache");
                    summary.warmed += 1;
                }
                Err(err) => {
                    warn!(username = %username, error = %err, "cache warmup failed");
                    summary.failed += 1;
                }
            }
        }

        info!(warmed = summary.warmed, failed = summary.failed, "cache warmup finished");
        summary
    }

    /// Run a pass now and then on every interval tick until `shutdown` fires.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            if self.config.usernames.is_empty() {
                info!("no warmup usernames configured");
                return;
            }

            // interval() panics on a zero period
            let period = self.config.interval.max(Duration::from_millis(1));
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = shutdown.cancelled() => break,
                            _ = self.run_once() => {}
                        }
                    }
                }
            }
            info!("cache warmup stopped");
        })
    }
}
