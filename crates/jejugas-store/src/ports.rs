use std::sync::Arc;

use async_trait::async_trait;
use jejugas_core::error::Result;
use jejugas_core::models::{BoundingBox, Station};

/// Read filter for station listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationFilter {
    /// Only rows with both latitude and longitude
    pub require_coordinates: bool,
    /// Only rows inside this rectangle (implies `require_coordinates`)
    pub within: Option<BoundingBox>,
    /// Case-insensitive brand code match
    pub brand: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl StationFilter {
    pub fn with_coordinates() -> Self {
        Self { require_coordinates: true, ..Self::default() }
    }

    pub fn within(mut self, rect: BoundingBox) -> Self {
        self.require_coordinates = true;
        self.within = Some(rect);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Whether `station` passes every predicate except paging
    pub fn matches(&self, station: &Station) -> bool {
        let location = station.location();
        if (self.require_coordinates || self.within.is_some()) && location.is_none() {
            return false;
        }

        if let (Some(rect), Some(point)) = (self.within, location) {
            if !rect.contains(&point) {
                return false;
            }
        }

        match (&self.brand, &station.brand) {
            (Some(wanted), Some(brand)) => wanted.eq_ignore_ascii_case(brand),
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// One page of stations plus the match count before paging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationPage {
    pub rows: Vec<Station>,
    pub total: usize,
}

/// Port for station persistence
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Insert or replace a station by `opinet_id` (last write wins)
    async fn upsert_station(&self, station: &Station) -> Result<()>;

    /// Upsert many stations, writing `chunk_size` rows at a time
    ///
    /// Returns the number of rows written.
    async fn upsert_stations(&self, stations: &[Station], chunk_size: usize) -> Result<usize>;

    /// Get a station by its upstream identifier
    async fn get_station(&self, opinet_id: &str) -> Result<Option<Station>>;

    /// List stations matching `filter`, ordered by `opinet_id`
    async fn list_stations(&self, filter: &StationFilter) -> Result<StationPage>;

    /// Number of stored stations
    async fn count(&self) -> Result<usize>;
}

// Shared handles (e.g. `Arc<dyn StationStore>` in server state) are stores too
#[async_trait]
impl<T> StationStore for Arc<T>
where
    T: StationStore + ?Sized,
{
    async fn upsert_station(&self, station: &Station) -> Result<()> {
        (**self).upsert_station(station).await
    }

    async fn upsert_stations(&self, stations: &[Station], chunk_size: usize) -> Result<usize> {
        (**self).upsert_stations(stations, chunk_size).await
    }

    async fn get_station(&self, opinet_id: &str) -> Result<Option<Station>> {
        (**self).get_station(opinet_id).await
    }

    async fn list_stations(&self, filter: &StationFilter) -> Result<StationPage> {
        (**self).list_stations(filter).await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_requires_coordinates() {
        let located = Station::new("A0001", "Located").with_location(33.5, 126.5);
        let unlocated = Station::new("A0002", "Unlocated");

        let filter = StationFilter::with_coordinates();
        assert!(filter.matches(&located));
        assert!(!filter.matches(&unlocated));

        assert!(StationFilter::default().matches(&unlocated));
    }

    #[test]
    fn test_filter_within_rect() {
        let rect = BoundingBox::new(33.4, 33.6, 126.4, 126.6);
        let filter = StationFilter::default().within(rect);

        assert!(filter.require_coordinates);
        assert!(filter.matches(&Station::new("A", "in").with_location(33.5, 126.5)));
        assert!(!filter.matches(&Station::new("B", "out").with_location(33.7, 126.5)));
    }

    #[test]
    fn test_filter_brand_case_insensitive() {
        let station = Station::new("A", "SK").with_brand("SKE");

        let filter = StationFilter::default().with_brand("ske");
        assert!(filter.matches(&station));
        assert!(!StationFilter::default().with_brand("GSC").matches(&station));
        assert!(!filter.matches(&Station::new("B", "No brand")));
    }
}
