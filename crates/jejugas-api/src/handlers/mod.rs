mod coordinates;
mod health;
mod ingest;
mod stations;

pub use coordinates::convert_coordinates;
pub use health::health_check;
pub use ingest::handle_ingest;
pub use stations::{get_station, search_stations};
