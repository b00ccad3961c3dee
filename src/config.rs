use std::env;
use std::time::Duration;

use tracing::info;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;
const DEFAULT_CACHE_ITEM_TTL_MINUTES: u64 = 10;
const DEFAULT_UPSTREAM_BASE_URL: &str = "https://hacker-news.firebaseio.com";
const DEFAULT_BEST_IDS_PATH: &str = "/v0/beststories.json";
const DEFAULT_ITEM_PATH_TEMPLATE: &str = "/v0/item/{id}.json";

/// Runtime options, read once at startup. Every option has a default;
/// unset or malformed values fall back rather than failing startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub request_timeout_ms: u64,
    pub cache_item_ttl_minutes: u64,
    pub upstream_base_url: String,
    pub best_ids_path: String,
    pub item_path_template: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            request_timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            cache_item_ttl_minutes: env::var("CACHE_ITEM_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_ITEM_TTL_MINUTES),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            best_ids_path: env::var("BEST_IDS_PATH")
                .unwrap_or_else(|_| DEFAULT_BEST_IDS_PATH.to_string()),
            item_path_template: env::var("ITEM_PATH_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_ITEM_PATH_TEMPLATE.to_string()),
        }
    }

    /// Time allowed for one inbound request, shared across its whole fan-out.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_item_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_item_ttl_minutes * 60)
    }

    pub fn log_summary(&self) {
        info!(
            "config: bind_addr={} request_timeout_ms={} cache_item_ttl_minutes={} upstream_base_url={} best_ids_path={} item_path_template={}",
            self.bind_addr,
            self.request_timeout_ms,
            self.cache_item_ttl_minutes,
            self.upstream_base_url,
            self.best_ids_path,
            self.item_path_template,
        );
    }
}
