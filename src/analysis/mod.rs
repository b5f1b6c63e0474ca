pub mod aggregate;
mod cache;
pub mod service;


pub use aggregate::{aggregate, DONUT_CIRCUMFERENCE, TOP_LANGUAGES};
pub use cache::{CacheOptions, FlightCache, RawStatsCache, StatsCache};
pub use service::StatsService;
