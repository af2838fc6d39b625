use jejugas_core::models::{GeoQuery, RankedResult};
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Search query plus the requested page
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: GeoQuery,
    pub page: usize,
    pub page_size: usize,
}

impl SearchRequest {
    pub fn new(query: GeoQuery) -> Self {
        Self { query, page: 1, page_size: DEFAULT_PAGE_SIZE }
    }

    /// Page numbers start at 1; the size is clamped to `[1, 100]`
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page.max(1);
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// A station sharing the lowest price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowestPriceStation {
    pub opinet_id: String,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Stations inside the radius before fuel eligibility was applied
    pub total_in_radius: usize,
    pub lowest_price_count: usize,
    pub lowest_price_stations: Vec<LowestPriceStation>,
}

/// One page of ranked stations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub items: Vec<RankedResult>,
    pub page: usize,
    pub page_size: usize,
    /// Ranked stations across all pages
    pub total: usize,
    pub total_pages: usize,
    pub stats: SearchStats,
}
