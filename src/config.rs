//! Runtime configuration, read from command-line flags with environment
//! variable fallbacks.

use std::num::NonZeroUsize;
use std::time::Duration;

use clap::Parser;

use crate::analysis::CacheOptions;
use crate::app::WarmupConfig;
use crate::github::DEFAULT_API_URL;
use crate::utils::split_csv;

/// Eleven hours between warmup passes
pub const DEFAULT_WARMUP_INTERVAL_MS: u64 = 39_600_000;

#[derive(Parser, Debug, Clone)]
#[command(name = "gitstats-card", version, about = "Serve GitHub stats cards as SVG", long_about = None)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "GITSTATS_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Token sent as a bearer credential to the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Upper bound on one upstream fetch, in milliseconds
    #[arg(long, env = "GITSTATS_UPSTREAM_TIMEOUT_MS", default_value_t = 30_000)]
    pub upstream_timeout_ms: u64,

    /// Keep at most this many cached results (unbounded when unset)
    #[arg(long, env = "GITSTATS_CACHE_MAX_ENTRIES")]
    pub cache_max_entries: Option<NonZeroUsize>,

    /// Expire cached results after this many milliseconds (never when unset)
    #[arg(long, env = "GITSTATS_CACHE_TTL_MS")]
    pub cache_ttl_ms: Option<u64>,

    /// Comma-separated usernames to pre-populate the cache for
    #[arg(long, env = "CACHE_WARMUP_USERNAMES", default_value = "")]
    pub warmup_usernames: String,

    #[arg(long, env = "CACHE_WARMUP_INCLUDE_ORGS", default_value_t = false)]
    pub warmup_include_orgs: bool,

    #[arg(long, env = "CACHE_WARMUP_INTERVAL_MS", default_value_t = DEFAULT_WARMUP_INTERVAL_MS)]
    pub warmup_interval_ms: u64,

    /// Emit logs as JSON lines
    #[arg(long, env = "GITSTATS_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            max_entries: self.cache_max_entries,
            ttl: self.cache_ttl_ms.map(Duration::from_millis),
        }
    }

    pub fn warmup_interval(&self) -> Duration {
        Duration::from_millis(self.warmup_interval_ms)
    }

    pub fn warmup_config(&self) -> WarmupConfig {
        WarmupConfig {
            usernames: split_csv(&self.warmup_usernames),
            include_orgs: self.warmup_include_orgs,
            interval: self.warmup_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["gitstats-card"]).unwrap();

        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.github_api_url, DEFAULT_API_URL);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_options(), CacheOptions::default());

        let warmup = config.warmup_config();
        assert!(warmup.usernames.is_empty());
        assert!(!warmup.include_orgs);
        assert_eq!(warmup.interval, Duration::from_millis(39_600_000));
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "gitstats-card",
            "--warmup-usernames",
            " alice, ,bob ",
            "--warmup-include-orgs",
            "--cache-max-entries",
            "100",
            "--cache-ttl-ms",
            "60000",
        ])
        .unwrap();

        let warmup = config.warmup_config();
        assert_eq!(warmup.usernames, vec!["alice".to_string(), "bob".to_string()]);
        assert!(warmup.include_orgs);

        let options = config.cache_options();
        assert_eq!(options.max_entries, NonZeroUsize::new(100));
        assert_eq!(options.ttl, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_zero_max_entries_is_rejected() {
        assert!(Config::try_parse_from(["gitstats-card", "--cache-max-entries", "0"]).is_err());
    }
}
