pub mod api;
pub mod cache;
pub mod cart;
pub mod config;
pub mod log;
pub mod providers;
pub mod rates;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Loads configuration, wires the rate provider and serves the API.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("Cart calculation service starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let rate_cache = Arc::new(cache::Cache::new());
    let provider = Arc::new(providers::cbr::CbrProvider::new(
        &config.provider.base_url,
        rate_cache,
        Duration::from_secs(config.provider.cache_ttl_secs),
        config.provider.retries,
        config.provider.retry_delay_ms,
    ));

    api::run_server(provider, &config.server.host, config.server.port).await
}
