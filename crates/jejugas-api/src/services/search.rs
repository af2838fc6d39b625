use jejugas_search::SearchPipeline;

use crate::dto::{SearchParams, SearchResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for public station searches
pub struct SearchService;

impl SearchService {
    /// Validate the query string, run the search pipeline, and shape the response
    pub async fn execute(state: &AppState, params: SearchParams) -> Result<SearchResponse, ApiError> {
        let request = params.into_request(state.settings.default_radius_km.value)?;

        let pipeline = SearchPipeline::new(state.store.clone())
            .with_candidate_limit(state.settings.candidate_limit.value);

        let outcome = pipeline.search(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Station search failed");
            ApiError::internal("Station search failed").with_details(e.to_string())
        })?;

        Ok(SearchResponse::from(outcome))
    }
}
