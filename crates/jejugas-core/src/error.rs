//! Error types for Jejugas

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JejugasError {
    // Station errors
    #[error("Station not found: {opinet_id}")]
    StationNotFound { opinet_id: String },

    // Query errors
    #[error("Invalid query parameter {field}: {reason}")]
    InvalidQuery { field: String, reason: String },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("Config file not found at {path}")]
    ConfigFileNotFound { path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JejugasError {
    pub fn invalid_query(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuery { field: field.into(), reason: reason.into() }
    }
}

impl From<serde_json::Error> for JejugasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JejugasError>;
