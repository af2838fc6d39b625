use jejugas_core::error::Result;
use jejugas_core::models::RankedResult;
use jejugas_geo::spatial::enclosing_rect;
use jejugas_store::ports::{StationFilter, StationStore};

use crate::filter::filter_by_radius;
use crate::models::{LowestPriceStation, SearchOutcome, SearchRequest, SearchStats};
use crate::rank::rank;

/// Default number of stored rows considered per search
pub const DEFAULT_CANDIDATE_LIMIT: usize = 500;

/// Search pipeline: store read, radius filter, ranking, pagination
pub struct SearchPipeline<S>
where
    S: StationStore,
{
    store: S,
    candidate_limit: usize,
}

impl<S> SearchPipeline<S>
where
    S: StationStore,
{
    /// Create a new search pipeline
    pub fn new(store: S) -> Self {
        Self { store, candidate_limit: DEFAULT_CANDIDATE_LIMIT }
    }

    pub fn with_candidate_limit(mut self, candidate_limit: usize) -> Self {
        self.candidate_limit = candidate_limit.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Execute a search request
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let query = &request.query;

        // Phase 1: candidate rows, narrowed to the radius envelope when located
        let filter = match &query.origin {
            Some(origin) => StationFilter::default().within(enclosing_rect(origin, query.radius_km)),
            None => StationFilter::default(),
        }
        .with_limit(self.candidate_limit);

        let candidates = self.store.list_stations(&filter).await?;
        if candidates.total > candidates.rows.len() {
            tracing::debug!(
                matched = candidates.total,
                limit = self.candidate_limit,
                "Candidate rows truncated"
            );
        }

        // Phase 2: exact radius check
        let in_radius: Vec<_> = match &query.origin {
            Some(origin) => filter_by_radius(candidates.rows, origin, query.radius_km)
                .into_iter()
                .map(|(station, distance)| (station, Some(distance)))
                .collect(),
            None => candidates.rows.into_iter().map(|station| (station, None)).collect(),
        };
        let total_in_radius = in_radius.len();

        // Phase 3: eligibility, tagging, ordering
        let ranked = rank(in_radius, query);
        let stats = build_stats(&ranked, total_in_radius, query.price_field());

        // Phase 4: pagination
        let page = request.page.max(1);
        let page_size = request.page_size.max(1);
        let total = ranked.len();
        let total_pages = total.div_ceil(page_size);
        let offset = (page - 1).saturating_mul(page_size);
        let items: Vec<RankedResult> = ranked.into_iter().skip(offset).take(page_size).collect();

        tracing::debug!(
            total_in_radius,
            total,
            page,
            returned = items.len(),
            "Search completed"
        );

        Ok(SearchOutcome { items, page, page_size, total, total_pages, stats })
    }
}

fn build_stats(
    ranked: &[RankedResult],
    total_in_radius: usize,
    price_field: jejugas_core::models::FuelType,
) -> SearchStats {
    let lowest_price_stations: Vec<LowestPriceStation> = ranked
        .iter()
        .filter(|result| result.is_lowest_price)
        .filter_map(|result| {
            let price = result.station.prices.usable(price_field)?;
            Some(LowestPriceStation {
                opinet_id: result.station.opinet_id.clone(),
                name: result.station.name.clone(),
                price,
            })
        })
        .collect();

    SearchStats {
        total_in_radius,
        lowest_price_count: lowest_price_stations.len(),
        lowest_price_stations,
    }
}
