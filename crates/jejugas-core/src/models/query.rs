use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::station::{FuelType, Station};
use crate::error::JejugasError;

pub const MIN_RADIUS_KM: f64 = 1.0;
pub const MAX_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Clamp a requested search radius into `[1, 10]` km.
///
/// Non-finite input falls back to the default radius.
pub fn clamp_radius(radius_km: f64) -> f64 {
    if radius_km.is_finite() {
        radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM)
    } else {
        DEFAULT_RADIUS_KM
    }
}

/// Location the user searches around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub lat: f64,
    pub lng: f64,
}

impl Origin {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Attribute results are sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Gasoline,
    Diesel,
    Lpg,
    PremiumGasoline,
    Distance,
}

impl SortKey {
    /// Price field behind a price sort key
    pub fn fuel(&self) -> Option<FuelType> {
        match self {
            SortKey::Gasoline => Some(FuelType::Gasoline),
            SortKey::Diesel => Some(FuelType::Diesel),
            SortKey::Lpg => Some(FuelType::Lpg),
            SortKey::PremiumGasoline => Some(FuelType::PremiumGasoline),
            SortKey::Name | SortKey::Distance => None,
        }
    }
}

impl FromStr for SortKey {
    type Err = JejugasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "distance" => Ok(SortKey::Distance),
            other => other.parse::<FuelType>().map(SortKey::from).map_err(|_| {
                JejugasError::invalid_query(
                    "sortBy",
                    format!(
                        "Unknown sort key: {}. Use name, distance, gasoline, diesel, lpg, or premium_gasoline",
                        other
                    ),
                )
            }),
        }
    }
}

impl From<FuelType> for SortKey {
    fn from(fuel: FuelType) -> Self {
        match fuel {
            FuelType::Gasoline => SortKey::Gasoline,
            FuelType::Diesel => SortKey::Diesel,
            FuelType::Lpg => SortKey::Lpg,
            FuelType::PremiumGasoline => SortKey::PremiumGasoline,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = JejugasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(JejugasError::invalid_query(
                "sortOrder",
                format!("Unknown sort order: {}. Use asc or desc", other),
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// One search request over the station set
#[derive(Debug, Clone, PartialEq)]
pub struct GeoQuery {
    /// `None` lists stations without distance filtering
    pub origin: Option<Origin>,
    pub radius_km: f64,
    pub fuel_type: Option<FuelType>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl GeoQuery {
    /// Listing without a location, sorted by name
    pub fn listing() -> Self {
        Self {
            origin: None,
            radius_km: DEFAULT_RADIUS_KM,
            fuel_type: None,
            sort_by: SortKey::Name,
            sort_order: SortOrder::Asc,
        }
    }

    /// Radius search around a point, nearest first
    pub fn near(lat: f64, lng: f64) -> Self {
        Self {
            origin: Some(Origin::new(lat, lng)),
            sort_by: SortKey::Distance,
            ..Self::listing()
        }
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = clamp_radius(radius_km);
        self
    }

    pub fn with_fuel(mut self, fuel_type: Option<FuelType>) -> Self {
        self.fuel_type = fuel_type;
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Price field used for lowest-price tagging
    pub fn price_field(&self) -> FuelType {
        self.fuel_type.unwrap_or(FuelType::Gasoline)
    }
}

/// Station with its per-request distance and lowest-price tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub station: Station,
    pub distance_km: Option<f64>,
    pub is_lowest_price: bool,
}
