//! Great-circle distance and radius envelopes

use geo::{Distance, HaversineMeasure, Point};
use jejugas_core::models::{BoundingBox, Origin};

/// Mean Earth radius used for all reported distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const HAVERSINE: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_KM * 1000.0);

const KM_PER_DEGREE_LAT: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Haversine distance in kilometers
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    HAVERSINE.distance(Point::new(lng1, lat1), Point::new(lng2, lat2)) / 1000.0
}

/// Distance from `origin` to a station location
pub fn distance_from(origin: &Origin, latitude: f64, longitude: f64) -> f64 {
    haversine_km(origin.lat, origin.lng, latitude, longitude)
}

/// Round to two decimals for display
pub fn round_distance(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Rectangle guaranteed to contain every point within `radius_km` of `origin`.
///
/// Used to narrow candidates before the exact haversine check.
pub fn enclosing_rect(origin: &Origin, radius_km: f64) -> BoundingBox {
    let d_lat = radius_km / KM_PER_DEGREE_LAT;
    let cos_lat = origin.lat.to_radians().cos().abs().max(1e-6);
    let d_lng = (radius_km / (KM_PER_DEGREE_LAT * cos_lat)).min(180.0);

    // Slight padding covers the latitude where the circle is widest
    let pad = 1.01;
    BoundingBox::new(
        origin.lat - d_lat * pad,
        origin.lat + d_lat * pad,
        origin.lng - d_lng * pad,
        origin.lng + d_lng * pad,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Destination, Haversine};
    use proptest::prelude::*;

    const JEJU_CITY: Origin = Origin { lat: 33.4996, lng: 126.5312 };

    #[test]
    fn test_known_distances() {
        let d = distance_from(&JEJU_CITY, 33.6, 126.9);
        assert!((d - 35.954).abs() < 0.01, "got {}", d);

        let d = distance_from(&JEJU_CITY, 33.51, 126.54);
        assert!((d - 1.415).abs() < 0.01, "got {}", d);

        assert_eq!(distance_from(&JEJU_CITY, JEJU_CITY.lat, JEJU_CITY.lng), 0.0);
    }

    #[test]
    fn test_round_distance() {
        assert_eq!(round_distance(3.50449), 3.5);
        assert_eq!(round_distance(1.4151), 1.42);
    }

    #[test]
    fn test_agrees_with_geo_crate() {
        // geo uses the IUGG mean radius (6371.0088 km)
        let ours = haversine_km(33.4996, 126.5312, 33.2474, 126.5601);
        let theirs = Haversine.distance(Point::new(126.5312, 33.4996), Point::new(126.5601, 33.2474))
            / 1000.0;
        assert!((ours - theirs).abs() / theirs < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_rect_contains_radius(
            bearing in 0.0f64..360.0,
            fraction in 0.0f64..1.0,
            radius in 1.0f64..10.0,
        ) {
            // Walk `fraction * radius` km from the origin along `bearing`
            let start = Point::new(JEJU_CITY.lng, JEJU_CITY.lat);
            let end = HAVERSINE.destination(start, bearing, fraction * radius * 1000.0);

            let rect = enclosing_rect(&JEJU_CITY, radius);
            prop_assert!(rect.contains_lat_lng(end.y(), end.x()));
        }

        #[test]
        fn prop_distance_is_symmetric(
            lat in 33.0f64..33.8,
            lng in 126.0f64..127.0,
        ) {
            let a = haversine_km(JEJU_CITY.lat, JEJU_CITY.lng, lat, lng);
            let b = haversine_km(lat, lng, JEJU_CITY.lat, JEJU_CITY.lng);
            prop_assert!((a - b).abs() < 1e-9);
        }
    }
}
