use std::sync::Arc;

use dataporten_cache::{CacheConfig, CachedHttpClient, CacheError};
use dataporten_config::DataportenConfig;
use tracing::info;

use crate::modules::groups::service::DataportenApi;
use crate::modules::users::tokens::TokenResolver;

/// Everything the groups middleware needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: DataportenConfig,
    pub api: DataportenApi,
    pub tokens: Arc<dyn TokenResolver>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: DataportenConfig, api: DataportenApi, tokens: Arc<dyn TokenResolver>) -> Self {
        Self {
            config,
            api,
            tokens,
        }
    }
}

/// Cache policy derived from the Dataporten settings.
pub fn cache_config(config: &DataportenConfig) -> CacheConfig {
    CacheConfig::new(config.cache_file(), config.cache_ttl())
}

/// Builds the HTTP client, opening the response cache when caching is enabled.
///
/// # Errors
///
/// Returns `CacheError` if the cache file cannot be opened.
pub async fn init_http_client(config: &DataportenConfig) -> Result<CachedHttpClient, CacheError> {
    let http = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    if !config.cache_requests {
        info!("Dataporten response cache disabled");
        return Ok(CachedHttpClient::uncached(http));
    }

    let client = CachedHttpClient::open(http, &cache_config(config)).await?;
    info!(
        cache.path = %config.cache_file().display(),
        cache.ttl_secs = config.cache_ttl_seconds,
        "Dataporten response cache enabled"
    );
    Ok(client)
}

pub async fn init_app_state(
    config: DataportenConfig,
    tokens: Arc<dyn TokenResolver>,
) -> Result<AppState, CacheError> {
    let http = init_http_client(&config).await?;
    let api = DataportenApi::new(http, &config.api_url);
    Ok(AppState::new(config, api, tokens))
}
