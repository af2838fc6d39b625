use chrono::{DateTime, Utc};
use jejugas_core::models::{FuelPrices, KatecPoint, RankedResult, Station, WgsPoint};
use jejugas_geo::spatial::round_distance;
use jejugas_search::{IngestReport, SearchOutcome, SearchStats};
use serde::Serialize;

/// Station as returned by the public endpoints
#[derive(Debug, Serialize)]
pub struct StationItem {
    pub opinet_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub prices: FuelPrices,
    /// Kilometers from the query point, two decimals; `null` without one
    pub distance: Option<f64>,
    pub is_lowest_price: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StationItem {
    fn from_station(station: Station, distance_km: Option<f64>, is_lowest_price: bool) -> Self {
        // Coordinates are only exposed as a pair
        let (latitude, longitude) = match station.location() {
            Some(point) => (Some(point.latitude), Some(point.longitude)),
            None => (None, None),
        };

        Self {
            opinet_id: station.opinet_id,
            name: station.name,
            brand: station.brand,
            address: station.address,
            phone: station.phone,
            latitude,
            longitude,
            prices: station.prices,
            distance: distance_km.map(round_distance),
            is_lowest_price,
            updated_at: station.updated_at,
        }
    }
}

impl From<RankedResult> for StationItem {
    fn from(result: RankedResult) -> Self {
        Self::from_station(result.station, result.distance_km, result.is_lowest_price)
    }
}

impl From<Station> for StationItem {
    fn from(station: Station) -> Self {
        Self::from_station(station, None, false)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Public search response envelope
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub items: Vec<StationItem>,
    pub pagination: Pagination,
    pub stats: SearchStats,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            success: true,
            items: outcome.items.into_iter().map(StationItem::from).collect(),
            pagination: Pagination {
                page: outcome.page,
                page_size: outcome.page_size,
                total: outcome.total,
                total_pages: outcome.total_pages,
            },
            stats: outcome.stats,
        }
    }
}

/// Single station response
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub success: bool,
    pub station: StationItem,
}

/// Coordinate conversion response
#[derive(Debug, Serialize)]
pub struct CoordinatesResponse {
    pub katec: KatecPoint,
    pub wgs84: Option<WgsPoint>,
}

/// Ingestion run response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: IngestReport,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "jejugas-api" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_rounds_distance() {
        let station = Station::new("A0001", "Jeju Central").with_location(33.4996, 126.5312);
        let item = StationItem::from(RankedResult {
            station,
            distance_km: Some(3.50449),
            is_lowest_price: true,
        });
        assert_eq!(item.distance, Some(3.5));
    }

    #[test]
    fn test_item_hides_half_coordinates() {
        let mut station = Station::new("A0001", "Half");
        station.latitude = Some(33.5);

        let item = StationItem::from(station);
        assert_eq!(item.latitude, None);
        assert_eq!(item.longitude, None);
        assert_eq!(item.distance, None);
    }

    #[test]
    fn test_pagination_is_camel_case() {
        let json = serde_json::to_value(Pagination { page: 1, page_size: 20, total: 3, total_pages: 1 })
            .unwrap();
        assert_eq!(json["pageSize"], 20);
        assert_eq!(json["totalPages"], 1);
    }
}
