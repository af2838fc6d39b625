use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::coords::{KatecPoint, WgsPoint};
use crate::error::JejugasError;

/// Fuel product sold at a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Lpg,
    PremiumGasoline,
}

impl FuelType {
    pub const ALL: [FuelType; 4] =
        [FuelType::Gasoline, FuelType::Diesel, FuelType::Lpg, FuelType::PremiumGasoline];

    /// Fuels considered when deciding whether a station has any usable price
    pub const MAIN: [FuelType; 3] = [FuelType::Gasoline, FuelType::Diesel, FuelType::Lpg];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Lpg => "lpg",
            FuelType::PremiumGasoline => "premium_gasoline",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = JejugasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Opinet product codes are accepted next to the readable names
        match s.trim().to_lowercase().as_str() {
            "gasoline" | "gasoline_price" | "b027" => Ok(FuelType::Gasoline),
            "diesel" | "diesel_price" | "d047" => Ok(FuelType::Diesel),
            "lpg" | "lpg_price" | "k015" => Ok(FuelType::Lpg),
            "premium_gasoline" | "premium_gasoline_price" | "premium" | "b034" => {
                Ok(FuelType::PremiumGasoline)
            }
            other => Err(JejugasError::invalid_query(
                "fuel",
                format!(
                    "Unknown fuel type: {}. Use gasoline, diesel, lpg, or premium_gasoline",
                    other
                ),
            )),
        }
    }
}

/// Latest posted prices in won; `None` when the station does not report one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelPrices {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub gasoline: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub diesel: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub lpg: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub premium_gasoline: Option<i64>,
}

impl FuelPrices {
    pub fn get(&self, fuel: FuelType) -> Option<i64> {
        match fuel {
            FuelType::Gasoline => self.gasoline,
            FuelType::Diesel => self.diesel,
            FuelType::Lpg => self.lpg,
            FuelType::PremiumGasoline => self.premium_gasoline,
        }
    }

    /// Price for `fuel` if it is present and positive
    pub fn usable(&self, fuel: FuelType) -> Option<i64> {
        self.get(fuel).filter(|price| *price > 0)
    }

    /// True when at least one of gasoline, diesel, or lpg is usable
    pub fn has_any_main_price(&self) -> bool {
        FuelType::MAIN.iter().any(|fuel| self.usable(*fuel).is_some())
    }
}

/// Gas station row as stored and searched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub opinet_id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Source coordinate the stored latitude/longitude were resolved from
    #[serde(default)]
    pub katec: Option<KatecPoint>,
    #[serde(default)]
    pub prices: FuelPrices,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Station {
    pub fn new(opinet_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            opinet_id: opinet_id.into(),
            name: name.into(),
            brand: None,
            address: None,
            phone: None,
            latitude: None,
            longitude: None,
            katec: None,
            prices: FuelPrices::default(),
            updated_at: None,
        }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_prices(mut self, prices: FuelPrices) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Stored location, only when both coordinates are present
    pub fn location(&self) -> Option<WgsPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(WgsPoint::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Station row as delivered by the upstream price feed, before coordinate resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStation {
    #[serde(alias = "UNI_ID")]
    pub opinet_id: String,
    #[serde(alias = "OS_NM")]
    pub name: String,
    #[serde(default, alias = "POLL_DIV_CD")]
    pub brand: Option<String>,
    #[serde(default, alias = "NEW_ADR")]
    pub address: Option<String>,
    #[serde(default, alias = "TEL")]
    pub phone: Option<String>,
    #[serde(default, alias = "GIS_X_COOR", deserialize_with = "lenient_f64")]
    pub katec_x: Option<f64>,
    #[serde(default, alias = "GIS_Y_COOR", deserialize_with = "lenient_f64")]
    pub katec_y: Option<f64>,
    #[serde(default)]
    pub prices: FuelPrices,
}

impl RawStation {
    /// Source coordinate, if usable
    pub fn katec(&self) -> Option<KatecPoint> {
        KatecPoint::from_raw(self.katec_x, self.katec_y)
    }

    /// Convert into a station with the resolved location (if any)
    pub fn into_station(self, location: Option<WgsPoint>, updated_at: DateTime<Utc>) -> Station {
        let katec = self.katec();
        Station {
            opinet_id: self.opinet_id,
            name: self.name,
            brand: self.brand,
            address: self.address,
            phone: self.phone,
            latitude: location.map(|p| p.latitude),
            longitude: location.map(|p| p.longitude),
            katec,
            prices: self.prices,
            updated_at: Some(updated_at),
        }
    }
}

/// Upstream feeds deliver numbers both as JSON numbers and as numeric strings
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.filter(|n| n.is_finite()).map(|n| n.round() as i64))
}
