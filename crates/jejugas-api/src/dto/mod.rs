mod request;
mod response;

pub use request::{CoordinateParams, SearchParams};
pub use response::{
    CoordinatesResponse, HealthResponse, IngestResponse, Pagination, SearchResponse,
    StationItem, StationResponse,
};
