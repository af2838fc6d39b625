use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::require_cron_secret;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cron = Router::new()
        .route("/api/cron/gas-stations", post(handlers::handle_ingest))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_cron_secret));

    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Public search
        .route("/api/public/gas-stations", get(handlers::search_stations))
        .route("/api/public/gas-stations/{opinet_id}", get(handlers::get_station))
        .route("/api/public/coordinates", get(handlers::convert_coordinates))

        // Scheduled ingestion
        .merge(cron)

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
