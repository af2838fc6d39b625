//! Radius filter and ranking properties over generated station sets.

use jejugas_core::models::{FuelPrices, FuelType, GeoQuery, Origin, SortKey, SortOrder, Station};
use jejugas_geo::spatial::distance_from;
use jejugas_search::{filter_by_radius, rank, SearchPipeline, SearchRequest};
use jejugas_store::MemoryStationStore;
use proptest::prelude::*;

const ORIGIN: Origin = Origin { lat: 33.4996, lng: 126.5312 };

fn station_strategy() -> impl Strategy<Value = (Option<(f64, f64)>, Option<i64>, Option<i64>)> {
    (
        prop::option::weighted(0.9, (33.3f64..33.7, 126.3f64..126.8)),
        prop::option::of(prop_oneof![Just(0i64), 1400i64..2000]),
        prop::option::of(1300i64..1900),
    )
}

fn build(specs: &[(Option<(f64, f64)>, Option<i64>, Option<i64>)]) -> Vec<Station> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (location, gasoline, diesel))| {
            let station = Station::new(format!("S{:03}", i), format!("Station {}", i))
                .with_prices(FuelPrices {
                    gasoline: *gasoline,
                    diesel: *diesel,
                    ..Default::default()
                });
            match location {
                Some((lat, lng)) => station.with_location(*lat, *lng),
                None => station,
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn radius_filter_membership(
        specs in prop::collection::vec(station_strategy(), 0..40),
        radius in 1.0f64..10.0,
    ) {
        let stations = build(&specs);
        let filtered = filter_by_radius(stations.clone(), &ORIGIN, radius);
        let kept: Vec<&str> = filtered.iter().map(|(s, _)| s.opinet_id.as_str()).collect();

        for station in &stations {
            let expected = station
                .location()
                .map(|p| distance_from(&ORIGIN, p.latitude, p.longitude) <= radius)
                .unwrap_or(false);
            prop_assert_eq!(kept.contains(&station.opinet_id.as_str()), expected);
        }
    }

    #[test]
    fn unpriced_sort_after_priced_ascending(
        specs in prop::collection::vec(station_strategy(), 0..40),
    ) {
        let stations: Vec<(Station, Option<f64>)> =
            build(&specs).into_iter().map(|s| (s, None)).collect();
        let query = GeoQuery::listing().with_sort(SortKey::Gasoline, SortOrder::Asc);

        let ranked = rank(stations, &query);
        let priced: Vec<bool> = ranked
            .iter()
            .map(|r| r.station.prices.usable(FuelType::Gasoline).is_some())
            .collect();

        if let Some(first_unpriced) = priced.iter().position(|p| !p) {
            prop_assert!(priced[first_unpriced..].iter().all(|p| !p));
        }
    }

    #[test]
    fn lowest_price_tags_match_minimum(
        specs in prop::collection::vec(station_strategy(), 1..40),
    ) {
        let stations: Vec<(Station, Option<f64>)> =
            build(&specs).into_iter().map(|s| (s, None)).collect();
        let query = GeoQuery::listing().with_fuel(Some(FuelType::Gasoline));

        let ranked = rank(stations, &query);
        let minimum = ranked.iter().filter_map(|r| r.station.prices.usable(FuelType::Gasoline)).min();

        for result in &ranked {
            let price = result.station.prices.usable(FuelType::Gasoline);
            prop_assert!(price.is_some());
            prop_assert_eq!(result.is_lowest_price, price == minimum);
        }
    }
}

#[tokio::test]
async fn search_through_store_matches_direct_filter() {
    let stations = build(&[
        (Some((33.4996, 126.5312)), Some(1700), None),
        (Some((33.51, 126.54)), Some(1650), None),
        (Some((33.52, 126.56)), Some(1650), Some(1500)),
        (Some((33.6, 126.9)), Some(1500), None),
        (None, Some(1400), None),
        (Some((33.5, 126.53)), Some(0), None),
    ]);
    let pipeline = SearchPipeline::new(MemoryStationStore::from_stations(stations));

    let query = GeoQuery::near(ORIGIN.lat, ORIGIN.lng)
        .with_radius(5.0)
        .with_fuel(Some(FuelType::Gasoline))
        .with_sort(SortKey::Gasoline, SortOrder::Asc);
    let outcome = pipeline.search(&SearchRequest::new(query)).await.unwrap();

    let ids: Vec<&str> = outcome.items.iter().map(|r| r.station.opinet_id.as_str()).collect();
    assert_eq!(ids, vec!["S001", "S002", "S000"]);
    assert_eq!(outcome.stats.total_in_radius, 4);
    assert_eq!(outcome.stats.lowest_price_count, 2);
    let lowest: Vec<&str> = outcome
        .stats
        .lowest_price_stations
        .iter()
        .map(|s| s.opinet_id.as_str())
        .collect();
    assert_eq!(lowest, vec!["S001", "S002"]);
}
