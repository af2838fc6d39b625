//! Remote KATEC to WGS84 transcoding

use std::time::Duration;

use async_trait::async_trait;
use jejugas_core::models::{BoundingBox, KatecPoint, WgsPoint};
use serde::Deserialize;
use serde_json::Value;

use crate::error::GeocodeError;

/// Port for a remote coordinate transcoding service
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Convert a source coordinate to WGS84.
    ///
    /// Returns `None` on any failure (transport error, timeout, non-success
    /// status, empty or malformed response, or an out-of-region result).
    /// Implementations never return an error to the caller.
    async fn convert(&self, katec: KatecPoint, timeout: Duration) -> Option<WgsPoint>;

    /// Identifier used in logs
    fn name(&self) -> &str;
}

const TRANSCOORD_PATH: &str = "/v2/local/geo/transcoord.json";

/// Kakao Local API `transcoord` client
pub struct KakaoGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    region: BoundingBox,
}

#[derive(Debug, Deserialize)]
struct TranscoordResponse {
    #[serde(default)]
    documents: Vec<TranscoordDocument>,
}

#[derive(Debug, Deserialize)]
struct TranscoordDocument {
    x: Value,
    y: Value,
}

impl KakaoGeocoder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, jejugas_core::config::DEFAULT_GEOCODER_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            region: BoundingBox::JEJU,
        }
    }

    /// One transcoding request, with the failure reason preserved
    pub async fn try_convert(
        &self,
        katec: KatecPoint,
        timeout: Duration,
    ) -> Result<WgsPoint, GeocodeError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}{}", self.base_url, TRANSCOORD_PATH),
            &[
                ("x", katec.x.to_string()),
                ("y", katec.y.to_string()),
                ("input_coord", "KTM".to_string()),
                ("output_coord", "WGS84".to_string()),
            ],
        )
        .map_err(|e| GeocodeError::Transport(format!("Invalid geocoder URL: {e}")))?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| GeocodeError::from_reqwest(e, timeout))?;

        if !response.status().is_success() {
            return Err(GeocodeError::HttpStatus { status: response.status().as_u16() });
        }

        let body: TranscoordResponse =
            response.json().await.map_err(|e| GeocodeError::from_reqwest(e, timeout))?;

        let document = body.documents.into_iter().next().ok_or(GeocodeError::EmptyResult)?;
        let longitude = parse_number(&document.x)?;
        let latitude = parse_number(&document.y)?;

        let point = WgsPoint::rounded(latitude, longitude);
        if !self.region.contains(&point) {
            return Err(GeocodeError::OutOfRegion { latitude, longitude });
        }

        Ok(point)
    }
}

#[async_trait]
impl Geocoder for KakaoGeocoder {
    async fn convert(&self, katec: KatecPoint, timeout: Duration) -> Option<WgsPoint> {
        match self.try_convert(katec, timeout).await {
            Ok(point) => Some(point),
            Err(e) => {
                tracing::warn!(katec = %katec, error = %e, "Geocoder conversion failed");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "kakao"
    }
}

/// Response coordinates arrive as JSON numbers or numeric strings
fn parse_number(value: &Value) -> Result<f64, GeocodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| GeocodeError::InvalidNumber(value.to_string()))
}
