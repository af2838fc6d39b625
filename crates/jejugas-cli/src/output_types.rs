use jejugas_core::models::{KatecPoint, RankedResult, WgsPoint};
use jejugas_geo::spatial::round_distance;
use jejugas_search::{IngestReport, SearchStats};
use serde::Serialize;
use tabled::Tabled;

/// Output for convert command
#[derive(Debug, Serialize)]
pub struct ConvertOutput {
    pub katec: KatecPoint,
    pub wgs84: Option<WgsPoint>,
    /// "geocoder" or "offline"
    pub mode: &'static str,
    /// Stage that answered: "geocoder", "projection" or "cache"
    pub source: Option<&'static str>,
    /// Projection candidate that matched, when known
    pub candidate: Option<&'static str>,
}

/// Output for convert --reverse
#[derive(Debug, Serialize)]
pub struct ReverseOutput {
    pub wgs84: WgsPoint,
    pub candidate: &'static str,
    pub projected: KatecPoint,
}

/// Output for ingest command
#[derive(Debug, Serialize)]
pub struct IngestOutput {
    pub input: String,
    pub output: String,
    pub stations_written: usize,
    pub report: IngestReport,
}

/// Output for search command
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub items: Vec<RankedResult>,
    pub stats: SearchStats,
}

/// One table row of the search command
#[derive(Debug, Tabled)]
pub struct StationRow {
    #[tabled(rename = "ID")]
    pub opinet_id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[tabled(rename = "Gasoline")]
    pub gasoline: String,
    #[tabled(rename = "Diesel")]
    pub diesel: String,
    #[tabled(rename = "LPG")]
    pub lpg: String,
    #[tabled(rename = "km")]
    pub distance: String,
    #[tabled(rename = "Lowest")]
    pub lowest: String,
}

impl From<&RankedResult> for StationRow {
    fn from(result: &RankedResult) -> Self {
        let station = &result.station;
        Self {
            opinet_id: station.opinet_id.clone(),
            name: station.name.clone(),
            brand: station.brand.clone().unwrap_or_default(),
            gasoline: price_cell(station.prices.gasoline),
            diesel: price_cell(station.prices.diesel),
            lpg: price_cell(station.prices.lpg),
            distance: result
                .distance_km
                .map(|d| format!("{:.2}", round_distance(d)))
                .unwrap_or_else(|| "-".to_string()),
            lowest: if result.is_lowest_price { "★".to_string() } else { String::new() },
        }
    }
}

fn price_cell(price: Option<i64>) -> String {
    match price.filter(|p| *p > 0) {
        Some(price) => price.to_string(),
        None => "-".to_string(),
    }
}

/// One row of the config command
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
