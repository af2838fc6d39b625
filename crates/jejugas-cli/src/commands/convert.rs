use crate::cli::ConvertArgs;
use crate::commands::build_resolver;
use crate::output::OutputWriter;
use crate::output_types::{ConvertOutput, ReverseOutput};
use crate::progress::create_spinner;
use anyhow::{bail, Context, Result};
use jejugas_core::config::LayeredConfig;
use jejugas_core::models::{KatecPoint, WgsPoint};
use jejugas_geo::FallbackProjector;

pub async fn execute(args: ConvertArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if args.reverse {
        return reverse(&args, output);
    }

    let katec = KatecPoint::new(args.x, args.y);
    let resolver = build_resolver(config, args.offline, output);

    let spinner = (!resolver.is_offline() && !output.is_json())
        .then(|| create_spinner("Calling coordinate transcoding service..."));
    let resolution = resolver.resolve_with_source(katec, config.geocode_timeout()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let wgs84 = resolution.map(|(point, _)| point);
    let source = resolution.map(|(_, source)| source);
    let candidate = source.and_then(|source| source.candidate());

    let result = ConvertOutput {
        katec,
        wgs84,
        mode: if resolver.is_offline() { "offline" } else { "geocoder" },
        source: source.map(|source| source.as_str()),
        candidate,
    };

    if output.is_json() {
        return output.result(result);
    }

    output.section("Coordinate Conversion");
    output.kv("KATEC", katec);
    output.kv("Mode", result.mode);
    if let Some(source) = result.source {
        output.kv("Resolved by", source);
    }
    match wgs84 {
        Some(point) => {
            output.kv("Latitude", point.latitude);
            output.kv("Longitude", point.longitude);
            if let Some(name) = candidate {
                output.kv("Projection", name);
            }
        }
        None => output.warning(format!("{} could not be resolved inside the service region", katec)),
    }

    Ok(())
}

fn reverse(args: &ConvertArgs, output: &OutputWriter) -> Result<()> {
    let projector = FallbackProjector::default();
    let Some(candidate) = projector.candidate(&args.candidate) else {
        let names: Vec<&str> = projector.candidates().iter().map(|c| c.name).collect();
        bail!("Unknown projection candidate '{}'. Available: {}", args.candidate, names.join(", "));
    };

    let wgs84 = WgsPoint::new(args.y, args.x);
    if !wgs84.is_finite() {
        bail!("Latitude and longitude must be finite numbers");
    }
    let projected = candidate
        .to_projected(wgs84)
        .with_context(|| format!("Failed to project with candidate '{}'", candidate.name))?;

    if output.is_json() {
        return output.result(ReverseOutput { wgs84, candidate: candidate.name, projected });
    }

    output.section("Reverse Projection");
    output.kv("WGS84", format!("{}, {}", wgs84.latitude, wgs84.longitude));
    output.kv("Candidate", candidate.name);
    output.kv("x", format!("{:.3}", projected.x));
    output.kv("y", format!("{:.3}", projected.y));

    Ok(())
}
