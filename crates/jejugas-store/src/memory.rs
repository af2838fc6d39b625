//! In-memory station store with an R-tree over station coordinates.

use async_trait::async_trait;
use jejugas_core::error::Result;
use jejugas_core::models::{BoundingBox, Station};
use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::ports::{StationFilter, StationPage, StationStore};

/// Index entry: `[longitude, latitude]` tagged with the station id
type IndexedStation = GeomWithData<[f64; 2], String>;

#[derive(Default)]
struct StoreState {
    stations: HashMap<String, Station>,
    index: RTree<IndexedStation>,
}

impl StoreState {
    fn upsert(&mut self, station: Station) {
        if let Some(previous) = self.stations.get(&station.opinet_id) {
            if let Some(entry) = index_entry(previous) {
                self.index.remove(&entry);
            }
        }

        if let Some(entry) = index_entry(&station) {
            self.index.insert(entry);
        }
        self.stations.insert(station.opinet_id.clone(), station);
    }

    fn ids_within(&self, rect: &BoundingBox) -> Vec<&str> {
        let envelope =
            AABB::from_corners([rect.min_lng, rect.min_lat], [rect.max_lng, rect.max_lat]);
        self.index.locate_in_envelope(&envelope).map(|entry| entry.data.as_str()).collect()
    }
}

fn index_entry(station: &Station) -> Option<IndexedStation> {
    let point = station.location().filter(|p| p.is_finite())?;
    Some(GeomWithData::new([point.longitude, point.latitude], station.opinet_id.clone()))
}

/// In-memory implementation of StationStore
#[derive(Clone, Default)]
pub struct MemoryStationStore {
    state: Arc<RwLock<StoreState>>,
}

impl std::fmt::Debug for MemoryStationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MemoryStationStore")
            .field("stations", &state.stations.len())
            .field("indexed", &state.index.size())
            .finish()
    }
}

impl MemoryStationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `stations`
    pub fn from_stations(stations: impl IntoIterator<Item = Station>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write().unwrap_or_else(PoisonError::into_inner);
            for station in stations {
                state.upsert(station);
            }
        }
        store
    }

    /// All stations ordered by `opinet_id`
    pub fn snapshot(&self) -> Vec<Station> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let mut rows: Vec<Station> = state.stations.values().cloned().collect();
        rows.sort_by(|a, b| a.opinet_id.cmp(&b.opinet_id));
        rows
    }
}

#[async_trait]
impl StationStore for MemoryStationStore {
    async fn upsert_station(&self, station: &Station) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.upsert(station.clone());
        Ok(())
    }

    async fn upsert_stations(&self, stations: &[Station], chunk_size: usize) -> Result<usize> {
        let mut written = 0;

        for chunk in stations.chunks(chunk_size.max(1)) {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            for station in chunk {
                state.upsert(station.clone());
            }
            written += chunk.len();
            tracing::trace!(rows = chunk.len(), "Upserted station chunk");
        }

        Ok(written)
    }

    async fn get_station(&self, opinet_id: &str) -> Result<Option<Station>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.stations.get(opinet_id).cloned())
    }

    async fn list_stations(&self, filter: &StationFilter) -> Result<StationPage> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);

        let mut matching: Vec<&Station> = match &filter.within {
            Some(rect) => state
                .ids_within(rect)
                .into_iter()
                .filter_map(|id| state.stations.get(id))
                .filter(|station| filter.matches(station))
                .collect(),
            None => state.stations.values().filter(|station| filter.matches(station)).collect(),
        };
        matching.sort_by(|a, b| a.opinet_id.cmp(&b.opinet_id));

        let total = matching.len();
        let rows = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(StationPage { rows, total })
    }

    async fn count(&self) -> Result<usize> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.stations.len())
    }
}
