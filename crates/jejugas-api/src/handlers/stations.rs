use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::dto::{SearchParams, SearchResponse, StationResponse};
use crate::error::ApiError;
use crate::services::SearchService;
use crate::state::AppState;

pub async fn search_stations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    tracing::info!(
        has_origin = params.lat.is_some() && params.lng.is_some(),
        radius = ?params.radius,
        fuel = ?params.fuel,
        sort_by = ?params.sort_by,
        "Processing station search"
    );

    let response = SearchService::execute(&state, params).await?;

    Ok(Json(response))
}

pub async fn get_station(
    State(state): State<Arc<AppState>>,
    Path(opinet_id): Path<String>,
) -> Result<Json<StationResponse>, ApiError> {
    let station = state
        .store
        .get_station(&opinet_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Station not found: {}", opinet_id)))?;

    Ok(Json(StationResponse { success: true, station: station.into() }))
}
