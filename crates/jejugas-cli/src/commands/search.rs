use crate::cli::SearchArgs;
use crate::output::OutputWriter;
use crate::output_types::{SearchOutput, StationRow};
use anyhow::{Context, Result};
use jejugas_core::config::LayeredConfig;
use jejugas_core::models::GeoQuery;
use jejugas_search::{SearchPipeline, SearchRequest};
use jejugas_store::snapshot::load_snapshot;

pub async fn execute(args: SearchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = load_snapshot(&args.stations)
        .with_context(|| format!("Failed to load stations from {}", args.stations.display()))?;

    let base = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => GeoQuery::near(lat, lng),
        _ => GeoQuery::listing(),
    };
    let sort_by = args.sort_by.unwrap_or(base.sort_by);
    let query = base
        .with_radius(args.radius.unwrap_or(config.default_radius_km.value))
        .with_fuel(args.fuel)
        .with_sort(sort_by, args.sort_order);

    let pipeline = SearchPipeline::new(store).with_candidate_limit(config.candidate_limit.value);
    let request = SearchRequest::new(query).with_page(args.page, args.page_size);
    let outcome = pipeline.search(&request).await.context("Search failed")?;

    if output.is_json() {
        return output.result(SearchOutput {
            page: outcome.page,
            page_size: outcome.page_size,
            total: outcome.total,
            total_pages: outcome.total_pages,
            items: outcome.items,
            stats: outcome.stats,
        });
    }

    output.section("Query");
    match &request.query.origin {
        Some(origin) => {
            output.kv("Origin", format!("{}, {}", origin.lat, origin.lng));
            output.kv("Radius", format!("{} km", request.query.radius_km));
        }
        None => output.kv("Origin", "none (listing)"),
    }
    output.kv(
        "Fuel",
        request.query.fuel_type.map(|f| f.to_string()).unwrap_or_else(|| "all".to_string()),
    );

    output.section("Stations");
    let rows: Vec<StationRow> = outcome.items.iter().map(StationRow::from).collect();
    output.table(rows);

    output.kv("Page", format!("{}/{} ({} stations)", outcome.page, outcome.total_pages.max(1), outcome.total));
    if request.query.origin.is_some() {
        output.kv("In radius", outcome.stats.total_in_radius);
    }
    if let Some(lowest) = outcome.stats.lowest_price_stations.first() {
        output.kv(
            "Lowest price",
            format!(
                "{} won ({} station{})",
                lowest.price,
                outcome.stats.lowest_price_count,
                if outcome.stats.lowest_price_count == 1 { "" } else { "s" }
            ),
        );
    }

    Ok(())
}
