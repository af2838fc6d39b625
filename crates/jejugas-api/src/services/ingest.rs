use jejugas_core::models::RawStation;
use jejugas_search::{IngestOptions, IngestPipeline, IngestReport};

use crate::error::ApiError;
use crate::state::AppState;

/// Service for scheduled ingestion of upstream station rows
pub struct IngestService;

impl IngestService {
    /// Resolve and persist `rows` with the server's shared resolver
    pub async fn execute(state: &AppState, rows: Vec<RawStation>) -> Result<IngestReport, ApiError> {
        let pipeline = IngestPipeline::new(
            state.store.clone(),
            state.resolver.clone(),
            IngestOptions::from_config(&state.settings),
        );

        pipeline.run(rows).await.map_err(|e| {
            tracing::error!(error = %e, "Station ingestion failed");
            ApiError::internal("Station ingestion failed").with_details(e.to_string())
        })
    }
}
