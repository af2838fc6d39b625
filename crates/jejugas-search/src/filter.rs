use jejugas_core::models::{Origin, Station};
use jejugas_geo::spatial::distance_from;

/// Keep stations within `radius_km` of `origin`, paired with their exact distance.
///
/// Stations without both coordinates are dropped. Input order is preserved.
pub fn filter_by_radius(
    stations: impl IntoIterator<Item = Station>,
    origin: &Origin,
    radius_km: f64,
) -> Vec<(Station, f64)> {
    stations
        .into_iter()
        .filter_map(|station| {
            let point = station.location()?;
            let distance = distance_from(origin, point.latitude, point.longitude);
            (distance <= radius_km).then_some((station, distance))
        })
        .collect()
}
