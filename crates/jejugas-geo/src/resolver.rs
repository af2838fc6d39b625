use std::sync::Arc;
use std::time::Duration;

use jejugas_core::models::{KatecPoint, WgsPoint};

use crate::cache::CoordinateCache;
use crate::geocoder::Geocoder;
use crate::projection::FallbackProjector;

/// Which stage produced a resolved point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Geocoder,
    /// Offline projection, naming the candidate that matched
    Projection(&'static str),
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Cache => "cache",
            ResolutionSource::Geocoder => "geocoder",
            ResolutionSource::Projection(_) => "projection",
        }
    }

    pub fn candidate(&self) -> Option<&'static str> {
        match *self {
            ResolutionSource::Projection(name) => Some(name),
            _ => None,
        }
    }
}

/// Resolves source coordinates: cache, then remote geocoder, then offline projection.
///
/// Every returned point lies inside the projector's region. Failures of either
/// stage are absorbed; the caller only sees `Some(point)` or `None`.
#[derive(Clone)]
pub struct CoordinateResolver {
    cache: Arc<CoordinateCache>,
    geocoder: Option<Arc<dyn Geocoder>>,
    projector: FallbackProjector,
}

impl CoordinateResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            cache: Arc::new(CoordinateCache::new()),
            geocoder: Some(geocoder),
            projector: FallbackProjector::default(),
        }
    }

    /// Projection-only resolver, used when no geocoder key is configured
    pub fn offline() -> Self {
        Self {
            cache: Arc::new(CoordinateCache::new()),
            geocoder: None,
            projector: FallbackProjector::default(),
        }
    }

    /// Share an existing cache, e.g. across ingestion runs
    pub fn with_cache(mut self, cache: Arc<CoordinateCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_projector(mut self, projector: FallbackProjector) -> Self {
        self.projector = projector;
        self
    }

    pub fn cache(&self) -> &Arc<CoordinateCache> {
        &self.cache
    }

    pub fn is_offline(&self) -> bool {
        self.geocoder.is_none()
    }

    /// Resolve from nullable upstream components; invalid input short-circuits
    /// without touching the cache or the geocoder.
    pub async fn resolve_raw(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        timeout: Duration,
    ) -> Option<WgsPoint> {
        let katec = KatecPoint::from_raw(x, y)?;
        self.resolve(katec, timeout).await
    }

    /// Resolve one coordinate; `timeout` bounds the geocoder request only
    pub async fn resolve(&self, katec: KatecPoint, timeout: Duration) -> Option<WgsPoint> {
        self.resolve_with_source(katec, timeout).await.map(|(point, _)| point)
    }

    /// Same as [`resolve`](Self::resolve), also reporting which stage answered
    pub async fn resolve_with_source(
        &self,
        katec: KatecPoint,
        timeout: Duration,
    ) -> Option<(WgsPoint, ResolutionSource)> {
        if !katec.is_valid() {
            return None;
        }

        if let Some(cached) = self.cache.get(&katec) {
            tracing::trace!(katec = %katec, "Coordinate cache hit");
            return cached.map(|point| (point, ResolutionSource::Cache));
        }

        let outcome = match self.remote(katec, timeout).await {
            Some(point) => Some((point, ResolutionSource::Geocoder)),
            None => self
                .projector
                .project_with_candidate(katec)
                .map(|(point, candidate)| (point, ResolutionSource::Projection(candidate.name))),
        };

        // A concurrent resolution of the same key may have been stored first
        let stored = self.cache.insert(&katec, outcome.map(|(point, _)| point))?;
        match outcome {
            Some((point, source)) if point == stored => Some((point, source)),
            _ => Some((stored, ResolutionSource::Cache)),
        }
    }

    async fn remote(&self, katec: KatecPoint, timeout: Duration) -> Option<WgsPoint> {
        let geocoder = self.geocoder.as_ref()?;
        let point = geocoder.convert(katec, timeout).await?;

        if self.projector.region().contains(&point) {
            Some(point)
        } else {
            tracing::warn!(
                katec = %katec,
                geocoder = geocoder.name(),
                point = %point,
                "Discarding geocoder result outside the service region"
            );
            None
        }
    }
}
