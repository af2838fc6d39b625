use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use jejugas_core::models::KatecPoint;

use crate::dto::{CoordinateParams, CoordinatesResponse};
use crate::state::AppState;

pub async fn convert_coordinates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoordinateParams>,
) -> Json<CoordinatesResponse> {
    let katec = KatecPoint::new(params.x, params.y);
    let wgs84 = state
        .resolver
        .resolve_raw(Some(params.x), Some(params.y), state.settings.geocode_timeout())
        .await;

    tracing::debug!(katec = %katec, resolved = wgs84.is_some(), "Coordinate conversion");

    Json(CoordinatesResponse { katec, wgs84 })
}
