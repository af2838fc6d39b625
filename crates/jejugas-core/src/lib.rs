//! Jejugas Core - Domain models, configuration, and errors
//!
//! This crate contains the shared domain types for the coordinate resolution
//! and station search pipeline.

pub mod config;
pub mod error;
pub mod models;

pub use error::{JejugasError, Result};
