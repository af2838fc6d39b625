//! Jejugas Search - Radius search, ranking, and batch ingestion
//!
//! The read path narrows stored stations to a radius, applies fuel
//! eligibility, tags the lowest prices, sorts, and paginates. The write path
//! resolves upstream coordinates in bounded batches and persists them.

pub mod filter;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod rank;

pub use filter::filter_by_radius;
pub use ingest::{IngestOptions, IngestPipeline, IngestReport};
pub use models::{LowestPriceStation, SearchOutcome, SearchRequest, SearchStats};
pub use pipeline::SearchPipeline;
pub use rank::rank;
