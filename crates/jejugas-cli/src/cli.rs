use clap::{Args, Parser, Subcommand};
use jejugas_core::models::{FuelType, SortKey, SortOrder};
use std::path::PathBuf;

/// Jejugas - Jeju gas-station coordinates and prices
#[derive(Parser, Debug)]
#[command(name = "jejugas")]
#[command(about = "KATEC coordinate conversion and gas-station price search", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML); defaults to ./jejugas.toml when present
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Kakao REST API key, overriding the configured one
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Base URL of the coordinate transcoding service
    #[arg(long, global = true, value_name = "URL")]
    pub geocoder_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one KATEC coordinate to WGS84 (or back with --reverse)
    Convert(ConvertArgs),

    /// Resolve coordinates for upstream station rows and write a station snapshot
    Ingest(IngestArgs),

    /// Search a station snapshot by radius, fuel, and price
    Search(SearchArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// KATEC x (easting); longitude with --reverse
    #[arg(long, allow_negative_numbers = true)]
    pub x: f64,

    /// KATEC y (northing); latitude with --reverse
    #[arg(long, allow_negative_numbers = true)]
    pub y: f64,

    /// Skip the remote geocoder and use the offline projection only
    #[arg(long)]
    pub offline: bool,

    /// Project a WGS84 point into a projection candidate instead
    #[arg(long)]
    pub reverse: bool,

    /// Projection candidate used by --reverse
    #[arg(long, default_value = "katec_bessel")]
    pub candidate: String,

    /// Geocoder timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// JSON file with upstream station rows
    pub input: PathBuf,

    /// Station snapshot to update; existing coordinates are reused
    #[arg(long, short = 'o', default_value = "stations.json")]
    pub output: PathBuf,

    /// Skip the remote geocoder and use the offline projection only
    #[arg(long)]
    pub offline: bool,

    /// Ignore an existing snapshot and resolve every row again
    #[arg(long)]
    pub fresh: bool,

    /// Rows resolved concurrently per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Stop starting new batches after this many seconds
    #[arg(long)]
    pub budget_secs: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Station snapshot written by `jejugas ingest`
    #[arg(default_value = "stations.json")]
    pub stations: PathBuf,

    /// Latitude of the search origin
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the search origin
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,

    /// Search radius in km, clamped to [1, 10]
    #[arg(long)]
    pub radius: Option<f64>,

    /// Only stations selling this fuel (gasoline, diesel, lpg, premium_gasoline)
    #[arg(long)]
    pub fuel: Option<FuelType>,

    /// Sort key (name, distance, gasoline, diesel, lpg, premium_gasoline)
    #[arg(long)]
    pub sort_by: Option<SortKey>,

    /// Sort order (asc or desc)
    #[arg(long, default_value = "asc")]
    pub sort_order: SortOrder,

    #[arg(long, default_value = "1")]
    pub page: usize,

    #[arg(long, default_value = "20")]
    pub page_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_requires_both_coordinates() {
        let result = Cli::try_parse_from(["jejugas", "search", "s.json", "--lat", "33.5"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "jejugas", "search", "s.json", "--lat", "33.5", "--lng", "126.5", "--fuel", "diesel",
        ])
        .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.fuel, Some(FuelType::Diesel));
                assert_eq!(args.sort_order, SortOrder::Asc);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fuel_is_rejected() {
        let result = Cli::try_parse_from(["jejugas", "search", "--fuel", "kerosene"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["jejugas", "convert", "--x", "1", "--y", "2", "--json"])
            .unwrap();
        assert!(cli.json);
    }
}
