use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use jejugas_core::config::LayeredConfig;
use jejugas_store::ports::StationStore;
use jejugas_store::snapshot::load_snapshot;
use jejugas_store::MemoryStationStore;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jejugas_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jejugas_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();

    let mut settings = LayeredConfig::with_defaults();
    if let Some(path) = &api_config.config_path {
        settings = settings
            .load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
    }
    let settings = settings.load_from_env();
    settings.validate().context("Invalid configuration")?;

    tracing::info!(
        port = api_config.port,
        geocoder = %settings.geocoder_base_url.value,
        geocoder_key = settings.geocoder_api_key.value.is_some(),
        cron_protected = api_config.cron_secret.is_some(),
        "Starting Jejugas API server"
    );

    let store: Arc<dyn StationStore> = match &api_config.stations_path {
        Some(path) => {
            let store = load_snapshot(path)
                .with_context(|| format!("Failed to load stations from {}", path.display()))?;
            tracing::info!(path = %path.display(), stations = store.count().await?, "Loaded station snapshot");
            Arc::new(store)
        }
        None => {
            tracing::info!("Starting with an empty station store (set JEJUGAS_STATIONS_FILE to preload)");
            Arc::new(MemoryStationStore::new())
        }
    };

    let state = Arc::new(
        AppState::from_settings(store, settings).with_cron_secret(api_config.cron_secret.clone()),
    );

    let origin = api_config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", api_config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(cors);

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
