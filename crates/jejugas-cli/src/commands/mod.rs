//! Command implementations

mod config;
mod convert;
mod ingest;
mod search;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use jejugas_core::config::{CliConfigOverrides, LayeredConfig};
use jejugas_geo::{CoordinateResolver, KakaoGeocoder};
use std::sync::Arc;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let mut overrides = CliConfigOverrides {
        geocoder_base_url: cli.geocoder_url,
        geocoder_api_key: cli.api_key,
        ..Default::default()
    };
    match &cli.command {
        Commands::Convert(args) => overrides.geocode_timeout_ms = args.timeout_ms,
        Commands::Ingest(args) => overrides.batch_size = args.batch_size,
        Commands::Search(_) | Commands::Config => {}
    }
    let config = load_config(cli.config.as_deref(), overrides)?;

    match cli.command {
        Commands::Convert(args) => convert::execute(args, &config, &output).await,
        Commands::Ingest(args) => ingest::execute(args, &config, &output).await,
        Commands::Search(args) => search::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// Remote geocoder when a key is configured and `offline` is not requested
fn build_resolver(config: &LayeredConfig, offline: bool, output: &OutputWriter) -> CoordinateResolver {
    match (&config.geocoder_api_key.value, offline) {
        (Some(key), false) => CoordinateResolver::new(Arc::new(KakaoGeocoder::with_base_url(
            key.clone(),
            config.geocoder_base_url.value.clone(),
        ))),
        (None, false) => {
            output.warning("No geocoder API key configured; using the offline projection");
            CoordinateResolver::offline()
        }
        (_, true) => CoordinateResolver::offline(),
    }
}
