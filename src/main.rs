use std::{sync::Arc, time::Duration};

use axum::Router;
use realface_web::{
    adapters::{
        controllers::proxy_controller::ProxyController,
        repositories::{DiskCacheStorage, MemoryCacheStorage},
        state::AppState,
    },
    application::{cache_agent::CacheAgent, repositories::cache_storage::CacheStorage},
    domain::config::cache::CacheConfig,
    services::ReqwestNetwork,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const INSTALL_ATTEMPTS: u32 = 3;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let origin_url =
        std::env::var("ORIGIN_URL").expect("ERROR: ORIGIN_URL environment variable must be set");

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    let mut cache_config = CacheConfig::default();
    if let Ok(cache_name) = std::env::var("CACHE_NAME") {
        cache_config = cache_config.with_cache_name(cache_name);
    }

    let storage: Arc<dyn CacheStorage> = match std::env::var("CACHE_DIR") {
        Ok(dir) => {
            tracing::info!("Using disk cache storage at {}", dir);
            Arc::new(DiskCacheStorage::new(dir))
        }
        Err(_) => {
            tracing::info!("Using in-memory cache storage");
            Arc::new(MemoryCacheStorage::new())
        }
    };

    let network = ReqwestNetwork::new(&origin_url).expect("ERROR: ORIGIN_URL is not a valid URL");

    tracing::info!(
        "Starting realface-web for {} with cache {}",
        origin_url,
        cache_config.cache_name
    );

    let cache_agent = Arc::new(CacheAgent::new(cache_config, storage, Arc::new(network)));

    // A failed install never activates: stale generations stay untouched.
    let mut attempt = 1;
    loop {
        match cache_agent.install().await {
            Ok(()) => break,
            Err(e) if attempt < INSTALL_ATTEMPTS => {
                tracing::warn!("Install attempt {} failed: {}", attempt, e);
                tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!("Giving up on install after {} attempts: {}", attempt, e);
                std::process::exit(1);
            }
        }
    }

    let stale = cache_agent
        .activate()
        .await
        .expect("Failed to clean up stale caches");
    tracing::info!("Activated; removed {} stale cache(s)", stale.len());

    let app_state = AppState { cache_agent };

    let router = Router::new()
        .fallback(ProxyController::intercept)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
