use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::error;

use super::state::AppState;
use crate::error::StatsError;
use crate::render::render_card;
use crate::types::FilterConfig;
use crate::utils::split_csv;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const CARD_CACHE_CONTROL: &str = "public, max-age=1800";

/// Query string of `GET /api/stats`
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub username: Option<String>,
    /// Comma-separated repository names
    pub exclude: Option<String>,
    #[serde(default)]
    pub include_orgs: bool,
    /// Comma-separated language names
    pub hide: Option<String>,
}

impl StatsQuery {
    fn filter(&self) -> FilterConfig {
        FilterConfig::new(
            split_csv(self.exclude.as_deref().unwrap_or_default()),
            split_csv(self.hide.as_deref().unwrap_or_default()),
            self.include_orgs,
        )
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/stats", get(stats_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn stats_handler(State(state): State<AppState>, Query(query): Query<StatsQuery>) -> Response {
    let username = match query.username.as_deref().map(str::trim) {
        Some(username) if !username.is_empty() => username.to_string(),
        _ => return (StatusCode::BAD_REQUEST, "Missing username").into_response(),
    };

    match state.service.get_stats(&username, &query.filter()).await {
        Ok(stats) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, SVG_CONTENT_TYPE),
                (header::CACHE_CONTROL, CARD_CACHE_CONTROL),
            ],
            render_card(&stats),
        )
            .into_response(),
        Err(err) => error_response(&username, err),
    }
}

fn error_response(username: &str, err: StatsError) -> Response {
    match err {
        StatsError::UserNotFound(_) => (StatusCode::NOT_FOUND, "User not found").into_response(),
        err => {
            error!(username = %username, error = %err, "failed to fetch stats");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching stats").into_response()
        }
    }
}
