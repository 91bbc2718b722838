use std::time::Duration;

use axum::Router;
use dbmodeler::core::config::Config;
use dbmodeler::core::sharing::{ShareApiState, ShareStore, share_router};
use tower_http::compression::{CompressionLayer, CompressionLevel};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

/// How often expired shares are swept in the background
const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load application config from environment variables
    let config = Config::from_env();

    tracing::info!(
        "Config loaded: capacity={}, ttl_days={}, data_dir={}",
        config.share_capacity,
        config.share_ttl_days,
        config.data_dir.display()
    );

    let store = ShareStore::new(config.share_capacity, config.share_ttl());

    // Sweep expired entries so memory is released even without traffic
    let sweeper = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sweeper.purge_expired();
            if purged > 0 {
                tracing::info!("Purged {} expired shares", purged);
            }
        }
    });

    let app = Router::new()
        .merge(share_router(ShareApiState::new(store)))
        .layer(CorsLayer::permissive())
        .layer(
            CompressionLayer::new()
                .br(true)
                .gzip(true)
                .quality(CompressionLevel::Default),
        );

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("Share API listening on http://{}/api/share", listener.local_addr()?);

    axum::serve(listener, app.into_make_service()).await
}
