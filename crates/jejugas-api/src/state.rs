use std::sync::Arc;

use jejugas_core::config::LayeredConfig;
use jejugas_geo::{CoordinateResolver, KakaoGeocoder};
use jejugas_store::ports::StationStore;

/// Shared handler state: one store, one resolver (and its cache) per server
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StationStore>,
    pub resolver: CoordinateResolver,
    pub settings: LayeredConfig,
    pub cron_secret: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StationStore>,
        resolver: CoordinateResolver,
        settings: LayeredConfig,
    ) -> Self {
        Self { store, resolver, settings, cron_secret: None }
    }

    /// Build the resolver from settings: remote geocoder when a key is
    /// configured, projection only otherwise
    pub fn from_settings(store: Arc<dyn StationStore>, settings: LayeredConfig) -> Self {
        let resolver = match &settings.geocoder_api_key.value {
            Some(key) => CoordinateResolver::new(Arc::new(KakaoGeocoder::with_base_url(
                key.clone(),
                settings.geocoder_base_url.value.clone(),
            ))),
            None => {
                tracing::warn!("No geocoder API key configured, resolving coordinates offline");
                CoordinateResolver::offline()
            }
        };
        Self::new(store, resolver, settings)
    }

    pub fn with_cron_secret(mut self, cron_secret: Option<String>) -> Self {
        self.cron_secret = cron_secret;
        self
    }
}
