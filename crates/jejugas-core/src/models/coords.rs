use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimal places kept for resolved WGS84 coordinates (~0.1 m).
pub const COORDINATE_DECIMALS: i32 = 6;

/// Round a coordinate component to [`COORDINATE_DECIMALS`] places
pub fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_DECIMALS);
    (value * factor).round() / factor
}

/// Projected source coordinate (KATEC / KTM family, meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KatecPoint {
    pub x: f64,
    pub y: f64,
}

impl KatecPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build a point from nullable upstream values.
    ///
    /// Missing, zero, or non-finite components yield `None`.
    pub fn from_raw(x: Option<f64>, y: Option<f64>) -> Option<Self> {
        let point = Self::new(x?, y?);
        point.is_valid().then_some(point)
    }

    /// A usable point has two finite, non-zero components
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x != 0.0 && self.y != 0.0
    }

    /// Key used by the resolution cache
    pub fn cache_key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl fmt::Display for KatecPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KATEC({}, {})", self.x, self.y)
    }
}

/// Geographic WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WgsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl WgsPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Create a point rounded to six decimal places
    pub fn rounded(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_coordinate(latitude),
            longitude: round_coordinate(longitude),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for WgsPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Latitude/longitude rectangle with inclusive edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Plausibility region for every resolved station coordinate
    pub const JEJU: BoundingBox = BoundingBox {
        min_lat: 33.0,
        max_lat: 33.8,
        min_lng: 126.0,
        max_lng: 128.2,
    };

    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self { min_lat, max_lat, min_lng, max_lng }
    }

    pub fn contains(&self, point: &WgsPoint) -> bool {
        point.is_finite()
            && point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
    }

    pub fn contains_lat_lng(&self, latitude: f64, longitude: f64) -> bool {
        self.contains(&WgsPoint::new(latitude, longitude))
    }
}
