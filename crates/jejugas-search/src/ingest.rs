//! Batch ingestion of upstream station rows.
//!
//! Rows are processed in fixed-size batches. Every coordinate resolution in a
//! batch starts together and the batch is persisted once all of them settled,
//! so one slow or failing lookup never aborts its neighbours.

use std::time::{Duration, Instant};

use chrono::Utc;
use jejugas_core::config::LayeredConfig;
use jejugas_core::error::Result;
use jejugas_core::models::{KatecPoint, RawStation, Station, WgsPoint};
use jejugas_geo::batch::resolve_batch;
use jejugas_geo::CoordinateResolver;
use jejugas_store::ports::StationStore;
use serde::{Deserialize, Serialize};

/// Tunables for one ingestion run
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub batch_timeout: Duration,
    pub upsert_chunk_size: usize,
    /// Stop starting new batches once this much wall-clock time has passed
    pub budget: Option<Duration>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            batch_timeout: Duration::from_millis(3000),
            upsert_chunk_size: 100,
            budget: Some(Duration::from_secs(270)),
        }
    }
}

impl IngestOptions {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            batch_size: config.batch_size.value,
            batch_timeout: config.batch_timeout(),
            upsert_chunk_size: config.upsert_chunk_size.value,
            budget: Some(config.ingest_budget()),
        }
    }

    pub fn without_budget(mut self) -> Self {
        self.budget = None;
        self
    }
}

/// Counters for one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Rows received
    pub total: usize,
    /// Rows whose coordinates were resolved in this run
    pub resolved: usize,
    /// Rows that kept coordinates already stored for the same source point
    pub reused: usize,
    /// Rows with a valid source point that could not be resolved
    pub unresolved: usize,
    /// Rows with a missing or zero source point
    pub invalid_input: usize,
    pub upserted: usize,
    /// Rows left for a later run because the time budget ran out
    pub deferred: usize,
    pub batches: usize,
}

/// What to do with one row's coordinates
enum Plan {
    Invalid,
    Reuse(WgsPoint),
    Resolve(KatecPoint),
}

/// Ingestion pipeline: resolve coordinates, then persist
pub struct IngestPipeline<S>
where
    S: StationStore,
{
    store: S,
    resolver: CoordinateResolver,
    options: IngestOptions,
}

impl<S> IngestPipeline<S>
where
    S: StationStore,
{
    /// Create a new ingestion pipeline
    pub fn new(store: S, resolver: CoordinateResolver, options: IngestOptions) -> Self {
        Self { store, resolver, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest `rows`, returning what happened to them
    pub async fn run(&self, rows: Vec<RawStation>) -> Result<IngestReport> {
        self.run_with_progress(rows, |_| {}).await
    }

    /// Ingest `rows`, calling `on_batch` with the running report after each batch
    pub async fn run_with_progress<F>(
        &self,
        rows: Vec<RawStation>,
        mut on_batch: F,
    ) -> Result<IngestReport>
    where
        F: FnMut(&IngestReport),
    {
        let started = Instant::now();
        let batch_size = self.options.batch_size.max(1);
        let mut report = IngestReport { total: rows.len(), ..Default::default() };

        let mut remaining = rows.into_iter().peekable();
        while remaining.peek().is_some() {
            if let Some(budget) = self.options.budget {
                if started.elapsed() >= budget {
                    report.deferred = remaining.count();
                    tracing::warn!(
                        deferred = report.deferred,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Ingestion budget exhausted, deferring remaining rows"
                    );
                    break;
                }
            }

            let batch: Vec<RawStation> = remaining.by_ref().take(batch_size).collect();
            let stations = self.process_batch(batch, &mut report).await?;

            report.upserted +=
                self.store.upsert_stations(&stations, self.options.upsert_chunk_size).await?;
            report.batches += 1;

            tracing::debug!(
                batch = report.batches,
                rows = stations.len(),
                resolved = report.resolved,
                unresolved = report.unresolved,
                "Persisted ingestion batch"
            );
            on_batch(&report);
        }

        tracing::info!(
            total = report.total,
            resolved = report.resolved,
            reused = report.reused,
            unresolved = report.unresolved,
            invalid_input = report.invalid_input,
            upserted = report.upserted,
            deferred = report.deferred,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ingestion finished"
        );

        Ok(report)
    }

    async fn process_batch(
        &self,
        batch: Vec<RawStation>,
        report: &mut IngestReport,
    ) -> Result<Vec<Station>> {
        let mut plans = Vec::with_capacity(batch.len());
        for row in &batch {
            plans.push(self.plan(row).await?);
        }

        let targets: Vec<Option<KatecPoint>> = plans
            .iter()
            .map(|plan| match plan {
                Plan::Resolve(katec) => Some(*katec),
                Plan::Invalid | Plan::Reuse(_) => None,
            })
            .collect();
        let resolved =
            resolve_batch(&self.resolver, &targets, targets.len(), self.options.batch_timeout).await;
        let locations = plans.iter().zip(resolved).map(|(plan, resolved)| match plan {
            Plan::Reuse(point) => Some(*point),
            Plan::Invalid | Plan::Resolve(_) => resolved,
        });

        let now = Utc::now();
        let stations = batch
            .into_iter()
            .zip(plans.iter().zip(locations))
            .map(|(row, (plan, location))| {
                match (plan, location) {
                    (Plan::Invalid, _) => report.invalid_input += 1,
                    (Plan::Reuse(_), _) => report.reused += 1,
                    (Plan::Resolve(_), Some(_)) => report.resolved += 1,
                    (Plan::Resolve(katec), None) => {
                        tracing::debug!(opinet_id = %row.opinet_id, katec = %katec, "Station left without coordinates");
                        report.unresolved += 1;
                    }
                }
                row.into_station(location, now)
            })
            .collect();

        Ok(stations)
    }

    async fn plan(&self, row: &RawStation) -> Result<Plan> {
        let Some(katec) = row.katec() else {
            return Ok(Plan::Invalid);
        };

        let existing = self.store.get_station(&row.opinet_id).await?;
        let reusable = existing
            .filter(|station| station.katec == Some(katec))
            .and_then(|station| station.location());

        Ok(match reusable {
            Some(point) => Plan::Reuse(point),
            None => Plan::Resolve(katec),
        })
    }
}
