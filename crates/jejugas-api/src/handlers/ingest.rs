use std::sync::Arc;

use axum::{extract::State, Json};
use jejugas_core::models::RawStation;

use crate::dto::IngestResponse;
use crate::error::ApiError;
use crate::services::IngestService;
use crate::state::AppState;

pub async fn handle_ingest(
    State(state): State<Arc<AppState>>,
    Json(rows): Json<Vec<RawStation>>,
) -> Result<Json<IngestResponse>, ApiError> {
    tracing::info!(rows = rows.len(), "Processing ingestion request");

    let report = IngestService::execute(&state, rows).await?;

    Ok(Json(IngestResponse { success: true, report }))
}
