use std::sync::Arc;

use dataporten::logging::init_tracing;
use dataporten::router::init_router;
use dataporten::{InMemoryTokenStore, init_app_state};
use dataporten_config::{DataportenConfig, ServerConfig};
use dotenvy::dotenv;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = DataportenConfig::from_env();
    let server = ServerConfig::from_env();

    let tokens: InMemoryTokenStore = server.demo_tokens.iter().cloned().collect();
    if tokens.is_empty() {
        warn!("DATAPORTEN_DEMO_TOKENS is empty; no user will get group data");
    }

    let state = init_app_state(config, Arc::new(tokens)).await?;

    if let Some(store) = state.api.http().store() {
        let purged = store.purge_expired(chrono::Utc::now()).await?;
        info!(cache.purged = purged, "Removed expired Dataporten responses");
    }

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(&server.bind_addr).await?;
    info!("Listening on http://{}", server.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
