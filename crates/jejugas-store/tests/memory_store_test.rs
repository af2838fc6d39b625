//! The R-tree pushdown must return exactly what a linear scan would.

use jejugas_core::models::{BoundingBox, Station};
use jejugas_store::{MemoryStationStore, StationFilter, StationStore};
use proptest::prelude::*;

fn stations_strategy() -> impl Strategy<Value = Vec<(f64, f64, bool)>> {
    prop::collection::vec((33.0f64..33.8, 126.0f64..127.0, any::<bool>()), 0..60)
}

fn build(rows: &[(f64, f64, bool)]) -> Vec<Station> {
    rows.iter()
        .enumerate()
        .map(|(i, (lat, lng, located))| {
            let station = Station::new(format!("S{:03}", i), format!("Station {}", i));
            if *located {
                station.with_location(*lat, *lng)
            } else {
                station
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn rect_query_matches_linear_scan(
        rows in stations_strategy(),
        lat in 33.0f64..33.8,
        lng in 126.0f64..127.0,
        half_height in 0.01f64..0.4,
        half_width in 0.01f64..0.5,
    ) {
        let stations = build(&rows);
        let rect = BoundingBox::new(lat - half_height, lat + half_height, lng - half_width, lng + half_width);
        let store = MemoryStationStore::from_stations(stations.clone());

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let page = runtime
            .block_on(store.list_stations(&StationFilter::default().within(rect)))
            .unwrap();

        let expected: Vec<String> = stations
            .iter()
            .filter(|s| s.location().map(|p| rect.contains(&p)).unwrap_or(false))
            .map(|s| s.opinet_id.clone())
            .collect();
        let actual: Vec<String> = page.rows.iter().map(|s| s.opinet_id.clone()).collect();

        prop_assert_eq!(page.total, expected.len());
        prop_assert_eq!(actual, expected);
    }
}

#[tokio::test]
async fn coordinate_filter_with_limit() {
    let store = MemoryStationStore::from_stations(vec![
        Station::new("A", "a").with_location(33.5, 126.5),
        Station::new("B", "b"),
        Station::new("C", "c").with_location(33.4, 126.6),
        Station::new("D", "d").with_location(33.3, 126.7),
    ]);

    let page = store
        .list_stations(&StationFilter::with_coordinates().with_limit(2))
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    let ids: Vec<&str> = page.rows.iter().map(|s| s.opinet_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);
}
