//! Fuel eligibility, lowest-price tagging, and ordering

use std::cmp::Ordering;

use jejugas_core::models::{FuelType, GeoQuery, RankedResult, SortKey, SortOrder, Station};

/// Stands in for a missing or non-positive price so that unpriced stations
/// sort after every priced one in ascending order
const PRICE_SENTINEL: i64 = i64::MAX;

/// Stands in for a missing distance
const DISTANCE_SENTINEL: f64 = f64::MAX;

/// Whether a station may appear in results for `fuel`.
///
/// With a fuel type the station needs a usable price for it; without one it
/// needs a usable gasoline, diesel, or lpg price.
pub fn is_eligible(station: &Station, fuel: Option<FuelType>) -> bool {
    match fuel {
        Some(fuel) => station.prices.usable(fuel).is_some(),
        None => station.prices.has_any_main_price(),
    }
}

/// Rank stations for `query`.
///
/// Drops ineligible stations, tags every station at the minimum price of the
/// query's price field, then sorts stably (ties keep their input order).
pub fn rank(
    stations: impl IntoIterator<Item = (Station, Option<f64>)>,
    query: &GeoQuery,
) -> Vec<RankedResult> {
    let eligible: Vec<(Station, Option<f64>)> = stations
        .into_iter()
        .filter(|(station, _)| is_eligible(station, query.fuel_type))
        .collect();

    let price_field = query.price_field();
    let lowest = eligible.iter().filter_map(|(s, _)| s.prices.usable(price_field)).min();

    let mut ranked: Vec<RankedResult> = eligible
        .into_iter()
        .map(|(station, distance_km)| {
            let is_lowest_price =
                lowest.is_some() && station.prices.usable(price_field) == lowest;
            RankedResult { station, distance_km, is_lowest_price }
        })
        .collect();

    ranked.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_by);
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    ranked
}

fn compare(a: &RankedResult, b: &RankedResult, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.station.name.cmp(&b.station.name),
        SortKey::Distance => a
            .distance_km
            .unwrap_or(DISTANCE_SENTINEL)
            .total_cmp(&b.distance_km.unwrap_or(DISTANCE_SENTINEL)),
        price_key => match price_key.fuel() {
            Some(fuel) => sort_price(&a.station, fuel).cmp(&sort_price(&b.station, fuel)),
            None => Ordering::Equal,
        },
    }
}

fn sort_price(station: &Station, fuel: FuelType) -> i64 {
    station.prices.usable(fuel).unwrap_or(PRICE_SENTINEL)
}
