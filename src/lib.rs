//! # GitHub Stats Card Library
//!
//! `gitstats_card` computes a per-user summary of GitHub activity and renders
//! it as a cacheable SVG card. It fetches a user's repositories and activity
//! counts, aggregates them into a single statistics record with donut-chart
//! geometry for the most used languages, and memoizes that record per request
//! shape.
//!
//! ## Features
//!
//! - Star, commit, pull request and issue totals
//! - Top five languages plus an "Other" bucket, with arc lengths and offsets
//! - Repository exclusion and case-insensitive language hiding
//! - Single-flight result cache with optional LRU bound and expiry
//! - Background cache warmup for a configured list of users
//! - An HTTP endpoint serving the rendered card
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gitstats_card::github::GithubClient;
//! use gitstats_card::types::FilterConfig;
//! use gitstats_card::{render_card, StatsCache, StatsService};
//!
//! # async fn run() -> gitstats_card::Result<()> {
//! let client = GithubClient::new("https://api.github.com", None)?;
//! let service = StatsService::new(Arc::new(client), StatsCache::default());
//!
//! let stats = service.get_stats("octocat", &FilterConfig::default()).await?;
//! let svg = render_card(&stats);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod github;
pub mod render;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analysis::{aggregate, CacheOptions, RawStatsCache, StatsCache, StatsService};
pub use error::{Result, StatsError};
pub use render::render_card;
pub use types::{CacheKey, FetchKey, FilterConfig, LanguageStat, RawStats, StatsResult};
