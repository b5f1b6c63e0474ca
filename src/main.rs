//! GitHub Stats Card Server
//!
//! Serves per-user GitHub stats cards as SVG and keeps the cache warm for a
//! configured set of users.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gitstats_card::app::{build_router, AppState, CacheWarmup};
use gitstats_card::config::Config;
use gitstats_card::github::GithubClient;
use gitstats_card::{StatsCache, StatsService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.log_json);

    let client = GithubClient::new(&config.github_api_url, config.github_token.as_deref())
        .context("failed to build GitHub client")?;
    let cache = StatsCache::new(config.cache_options());
    let service = StatsService::new(Arc::new(client), cache)
        .with_upstream_timeout(config.upstream_timeout());

    let shutdown = CancellationToken::new();
    let warmup = CacheWarmup::new(service.clone(), config.warmup_config())
        .spawn(shutdown.child_token());

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "gitstats-card listening");

    axum::serve(listener, build_router(AppState::new(service)))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server error")?;

    shutdown.cancel();
    if let Err(err) = warmup.await {
        tracing::warn!(error = %err, "warmup task ended abnormally");
    }
    info!("shutdown complete");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received");
}

fn init_tracing(log_json: bool) {
    let default_level = if cfg!(feature = "dev") { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
