use crate::error::{JejugasError, Result};
use crate::models::query::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://dapi.kakao.com";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for coordinate resolution, ingestion, and search
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub geocoder_base_url: ConfigValue<String>,
    pub geocoder_api_key: ConfigValue<Option<String>>,
    pub geocode_timeout_ms: ConfigValue<u64>,
    pub batch_timeout_ms: ConfigValue<u64>,
    pub batch_size: ConfigValue<usize>,
    pub upsert_chunk_size: ConfigValue<usize>,
    pub candidate_limit: ConfigValue<usize>,
    pub default_radius_km: ConfigValue<f64>,
    pub ingest_budget_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            geocoder_base_url: ConfigValue::new(
                DEFAULT_GEOCODER_BASE_URL.to_string(),
                ConfigSource::Default,
            ),
            geocoder_api_key: ConfigValue::new(None, ConfigSource::Default),
            geocode_timeout_ms: ConfigValue::new(5000, ConfigSource::Default),
            batch_timeout_ms: ConfigValue::new(3000, ConfigSource::Default),
            batch_size: ConfigValue::new(50, ConfigSource::Default),
            upsert_chunk_size: ConfigValue::new(100, ConfigSource::Default),
            candidate_limit: ConfigValue::new(500, ConfigSource::Default),
            default_radius_km: ConfigValue::new(5.0, ConfigSource::Default),
            ingest_budget_secs: ConfigValue::new(270, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(JejugasError::ConfigFileNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path).map_err(|e| JejugasError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| JejugasError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(url) = file_config.geocoder_base_url {
            self.geocoder_base_url.update(url, ConfigSource::File);
        }
        if let Some(key) = file_config.geocoder_api_key {
            self.geocoder_api_key.update(Some(key), ConfigSource::File);
        }
        if let Some(ms) = file_config.geocode_timeout_ms {
            self.geocode_timeout_ms.update(ms, ConfigSource::File);
        }
        if let Some(ms) = file_config.batch_timeout_ms {
            self.batch_timeout_ms.update(ms, ConfigSource::File);
        }
        if let Some(size) = file_config.batch_size {
            self.batch_size.update(size, ConfigSource::File);
        }
        if let Some(size) = file_config.upsert_chunk_size {
            self.upsert_chunk_size.update(size, ConfigSource::File);
        }
        if let Some(limit) = file_config.candidate_limit {
            self.candidate_limit.update(limit, ConfigSource::File);
        }
        if let Some(radius) = file_config.default_radius_km {
            self.default_radius_km.update(radius, ConfigSource::File);
        }
        if let Some(secs) = file_config.ingest_budget_secs {
            self.ingest_budget_secs.update(secs, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // JEJUGAS_GEOCODER_URL
        if let Ok(url) = env::var("JEJUGAS_GEOCODER_URL") {
            self.geocoder_base_url.update(url, ConfigSource::Environment);
        }

        // JEJUGAS_GEOCODER_API_KEY, falling back to the provider's own variable
        let api_key = env::var("JEJUGAS_GEOCODER_API_KEY")
            .or_else(|_| env::var("KAKAO_REST_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        if let Some(key) = api_key {
            self.geocoder_api_key.update(Some(key), ConfigSource::Environment);
        }

        if let Some(ms) = parse_env::<u64>("JEJUGAS_GEOCODE_TIMEOUT_MS", "milliseconds") {
            self.geocode_timeout_ms.update(ms, ConfigSource::Environment);
        }
        if let Some(ms) = parse_env::<u64>("JEJUGAS_BATCH_TIMEOUT_MS", "milliseconds") {
            self.batch_timeout_ms.update(ms, ConfigSource::Environment);
        }
        if let Some(size) = parse_env::<usize>("JEJUGAS_BATCH_SIZE", "positive integer") {
            self.batch_size.update(size, ConfigSource::Environment);
        }
        if let Some(size) = parse_env::<usize>("JEJUGAS_UPSERT_CHUNK_SIZE", "positive integer") {
            self.upsert_chunk_size.update(size, ConfigSource::Environment);
        }
        if let Some(limit) = parse_env::<usize>("JEJUGAS_CANDIDATE_LIMIT", "positive integer") {
            self.candidate_limit.update(limit, ConfigSource::Environment);
        }
        if let Some(radius) = parse_env::<f64>("JEJUGAS_DEFAULT_RADIUS_KM", "kilometers") {
            self.default_radius_km.update(radius, ConfigSource::Environment);
        }
        if let Some(secs) = parse_env::<u64>("JEJUGAS_INGEST_BUDGET_SECS", "seconds") {
            self.ingest_budget_secs.update(secs, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(url) = overrides.geocoder_base_url {
            self.geocoder_base_url.update(url, ConfigSource::Cli);
        }
        if let Some(key) = overrides.geocoder_api_key {
            self.geocoder_api_key.update(Some(key), ConfigSource::Cli);
        }
        if let Some(ms) = overrides.geocode_timeout_ms {
            self.geocode_timeout_ms.update(ms, ConfigSource::Cli);
        }
        if let Some(size) = overrides.batch_size {
            self.batch_size.update(size, ConfigSource::Cli);
        }
        if let Some(radius) = overrides.default_radius_km {
            self.default_radius_km.update(radius, ConfigSource::Cli);
        }
    }

    /// Check value ranges after all layers are applied
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("geocode_timeout_ms", self.geocode_timeout_ms.value as usize),
            ("batch_timeout_ms", self.batch_timeout_ms.value as usize),
            ("batch_size", self.batch_size.value),
            ("upsert_chunk_size", self.upsert_chunk_size.value),
            ("candidate_limit", self.candidate_limit.value),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(JejugasError::ConfigInvalid {
                    key: key.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        let radius = self.default_radius_km.value;
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius) {
            return Err(JejugasError::ConfigInvalid {
                key: "default_radius_km".to_string(),
                reason: format!(
                    "{} is outside [{}, {}] km",
                    radius, MIN_RADIUS_KM, MAX_RADIUS_KM
                ),
            });
        }

        if self.geocoder_base_url.value.trim().is_empty() {
            return Err(JejugasError::ConfigMissing { key: "geocoder_base_url".to_string() });
        }

        Ok(())
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms.value)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms.value)
    }

    pub fn ingest_budget(&self) -> Duration {
        Duration::from_secs(self.ingest_budget_secs.value)
    }

    /// Get all configuration values as a map for inspection.
    ///
    /// The API key is never echoed back.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "geocoder_base_url".to_string(),
            (self.geocoder_base_url.value.clone(), self.geocoder_base_url.source),
        );

        let key_state = match &self.geocoder_api_key.value {
            Some(_) => "(set)",
            None => "(unset)",
        };
        map.insert(
            "geocoder_api_key".to_string(),
            (key_state.to_string(), self.geocoder_api_key.source),
        );

        insert_display(&mut map, "geocode_timeout_ms", &self.geocode_timeout_ms);
        insert_display(&mut map, "batch_timeout_ms", &self.batch_timeout_ms);
        insert_display(&mut map, "batch_size", &self.batch_size);
        insert_display(&mut map, "upsert_chunk_size", &self.upsert_chunk_size);
        insert_display(&mut map, "candidate_limit", &self.candidate_limit);
        insert_display(&mut map, "default_radius_km", &self.default_radius_km);
        insert_display(&mut map, "ingest_budget_secs", &self.ingest_budget_secs);

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn insert_display<T: Display>(
    map: &mut HashMap<String, (String, ConfigSource)>,
    key: &str,
    value: &ConfigValue<T>,
) {
    map.insert(key.to_string(), (value.value.to_string(), value.source));
}

fn parse_env<T: FromStr>(name: &str, expected: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected {}", name, raw, expected);
            None
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    geocoder_base_url: Option<String>,
    geocoder_api_key: Option<String>,
    geocode_timeout_ms: Option<u64>,
    batch_timeout_ms: Option<u64>,
    batch_size: Option<usize>,
    upsert_chunk_size: Option<usize>,
    candidate_limit: Option<usize>,
    default_radius_km: Option<f64>,
    ingest_budget_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub geocoder_base_url: Option<String>,
    pub geocoder_api_key: Option<String>,
    pub geocode_timeout_ms: Option<u64>,
    pub batch_size: Option<usize>,
    pub default_radius_km: Option<f64>,
}
