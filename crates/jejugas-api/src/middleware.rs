use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Reject requests without the configured cron bearer token
pub async fn require_cron_secret(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(secret) = state.cron_secret.as_deref() else {
        return next.run(req).await;
    };

    let authorized = extract_bearer_token(req.headers().get(AUTHORIZATION)) == Some(secret);
    if authorized {
        next.run(req).await
    } else {
        tracing::warn!(uri = %req.uri(), "Rejected cron request without valid token");
        ApiError::unauthorized("missing or invalid bearer token").into_response()
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
