//! Jejugas Geo - Coordinate resolution and distance math
//!
//! This crate turns KATEC source coordinates into WGS84 points (remote
//! transcoding service first, offline projection second, memoized in an
//! explicit cache) and provides the great-circle distance used by search.

pub mod batch;
pub mod cache;
pub mod error;
pub mod geocoder;
pub mod projection;
pub mod resolver;
pub mod spatial;

pub use cache::CoordinateCache;
pub use error::{GeocodeError, ProjectionError};
pub use geocoder::{Geocoder, KakaoGeocoder};
pub use projection::{FallbackProjector, ProjectionCandidate, CANDIDATES};
pub use resolver::{CoordinateResolver, ResolutionSource};
