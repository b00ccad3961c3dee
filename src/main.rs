use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod feed;
mod hn_client;
mod models;
mod server;

use crate::cache::MemoryStoryCache;
use crate::config::AppConfig;
use crate::feed::BestStoriesFeed;
use crate::hn_client::HackerNewsClient;
use crate::server::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hacker_news_feed=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();
    config.log_summary();

    let api = Arc::new(HackerNewsClient::new(&config)?);
    let cache = Arc::new(MemoryStoryCache::new(config.cache_item_ttl()));
    let feed = Arc::new(BestStoriesFeed::new(api, cache));

    let app = server::router(AppState {
        feed,
        request_timeout: config.request_timeout(),
    });

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
