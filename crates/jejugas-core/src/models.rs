pub mod coords;
pub mod query;
pub mod station;

pub use coords::{round_coordinate, BoundingBox, KatecPoint, WgsPoint};
pub use query::{clamp_radius, GeoQuery, Origin, RankedResult, SortKey, SortOrder};
pub use station::{FuelPrices, FuelType, RawStation, Station};
