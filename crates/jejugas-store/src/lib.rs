//! Jejugas Store - Station storage port and adapters
//!
//! This crate defines the persistence port consumed by search and ingestion
//! and provides an in-memory adapter with a spatial index, plus JSON
//! snapshot files for the CLI.

pub mod memory;
pub mod ports;
pub mod snapshot;

pub use memory::MemoryStationStore;
pub use ports::{StationFilter, StationPage, StationStore};
