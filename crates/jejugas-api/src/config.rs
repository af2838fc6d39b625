use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Bearer token required by the ingestion endpoint; open when unset
    pub cron_secret: Option<String>,
    /// Layered configuration file (TOML)
    pub config_path: Option<PathBuf>,
    /// Station snapshot loaded into the store at startup
    pub stations_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            cron_secret: None,
            config_path: None,
            stations_path: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("JEJUGAS_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT);

        let cors_origin =
            env::var("JEJUGAS_CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        Self {
            port,
            cors_origin,
            cron_secret: non_blank("JEJUGAS_CRON_SECRET"),
            config_path: non_blank("JEJUGAS_CONFIG").map(PathBuf::from),
            stations_path: non_blank("JEJUGAS_STATIONS_FILE").map(PathBuf::from),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn non_blank(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
