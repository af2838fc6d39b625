//! Failure reasons of the geocoder and the offline projector.
//!
//! None of these reach resolver callers; geocoder errors are logged and
//! collapsed into a fallback to the offline projector, and projector errors
//! disqualify a single candidate.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoder request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Geocoder request failed: {0}")]
    Transport(String),

    #[error("Geocoder returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Geocoder returned no documents")]
    EmptyResult,

    #[error("Geocoder returned a non-numeric coordinate: {0}")]
    InvalidNumber(String),

    #[error("Geocoder result ({latitude}, {longitude}) is outside the service region")]
    OutOfRegion { latitude: f64, longitude: f64 },
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Failed to build transformation for candidate {candidate}: {reason}")]
    Create { candidate: &'static str, reason: String },

    #[error("Candidate {candidate} failed to transform the coordinate: {reason}")]
    Convert { candidate: &'static str, reason: String },
}

impl GeocodeError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            GeocodeError::Timeout(timeout)
        } else if let Some(status) = err.status() {
            GeocodeError::HttpStatus { status: status.as_u16() }
        } else {
            GeocodeError::Transport(err.to_string())
        }
    }
}
