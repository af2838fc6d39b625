use crate::cli::IngestArgs;
use crate::commands::build_resolver;
use crate::output::OutputWriter;
use crate::output_types::IngestOutput;
use crate::progress::IngestProgress;
use anyhow::{bail, Context, Result};
use jejugas_core::config::LayeredConfig;
use jejugas_core::models::RawStation;
use jejugas_search::{IngestOptions, IngestPipeline};
use jejugas_store::snapshot::{load_snapshot, save_snapshot};
use jejugas_store::MemoryStationStore;
use serde_json::Value;
use std::fs;
use std::time::Duration;

pub async fn execute(args: IngestArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let rows = parse_rows(&content)
        .with_context(|| format!("Failed to parse station rows in {}", args.input.display()))?;

    let store = if !args.fresh && args.output.is_file() {
        load_snapshot(&args.output)
            .with_context(|| format!("Failed to load existing snapshot {}", args.output.display()))?
    } else {
        MemoryStationStore::new()
    };

    // Shell runs have no platform deadline unless one is asked for
    let mut options = IngestOptions::from_config(config).without_budget();
    if let Some(secs) = args.budget_secs {
        options.budget = Some(Duration::from_secs(secs));
    }

    let resolver = build_resolver(config, args.offline, output);
    let pipeline = IngestPipeline::new(store, resolver, options);

    output.info(format!("Ingesting {} rows from {}", rows.len(), args.input.display()));
    let progress = IngestProgress::new(rows.len(), output.is_json());

    let report = pipeline
        .run_with_progress(rows, |report| {
            let processed =
                report.resolved + report.reused + report.unresolved + report.invalid_input;
            progress.update(processed, report.unresolved);
        })
        .await
        .context("Ingestion failed")?;
    progress.finish(report.upserted);

    let written = save_snapshot(pipeline.store(), &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if output.is_json() {
        return output.result(IngestOutput {
            input: args.input.display().to_string(),
            output: args.output.display().to_string(),
            stations_written: written,
            report,
        });
    }

    output.section("Ingestion Summary");
    output.kv("Rows", report.total);
    output.kv("Resolved", report.resolved);
    output.kv("Reused", report.reused);
    output.kv("Unresolved", report.unresolved);
    output.kv("Invalid input", report.invalid_input);
    output.kv("Batches", report.batches);
    if report.deferred > 0 {
        output.warning(format!("{} rows deferred after the time budget ran out", report.deferred));
    }
    output.success(format!("Wrote {} stations to {}", written, args.output.display()));

    Ok(())
}

/// Accept either a bare array of rows or the upstream `{"RESULT": {"OIL": [...]}}` envelope
fn parse_rows(content: &str) -> Result<Vec<RawStation>> {
    let value: Value = serde_json::from_str(content)?;
    let rows = match value {
        Value::Array(rows) => Value::Array(rows),
        Value::Object(mut map) => {
            let oil = map
                .remove("RESULT")
                .and_then(|mut result| result.get_mut("OIL").map(Value::take));
            match oil {
                Some(rows @ Value::Array(_)) => rows,
                _ => bail!("Expected a JSON array of stations or a RESULT.OIL array"),
            }
        }
        _ => bail!("Expected a JSON array of stations"),
    };
    Ok(serde_json::from_value(rows)?)
}
