//! Application wiring: the HTTP surface and the background cache warmup.

mod routes;
mod state;
mod warmup;

pub use routes::{build_router, StatsQuery, CARD_CACHE_CONTROL, SVG_CONTENT_TYPE};
pub use state::AppState;
pub use warmup::{CacheWarmup, WarmupConfig, WarmupSummary};
