//! JSON snapshot files of the station set

use std::fs;
use std::path::Path;

use jejugas_core::error::{JejugasError, Result};
use jejugas_core::models::Station;

use crate::memory::MemoryStationStore;

/// Read a JSON array of stations into a fresh store
pub fn load_snapshot(path: &Path) -> Result<MemoryStationStore> {
    let content = fs::read_to_string(path).map_err(|e| {
        JejugasError::Storage(format!("Failed to read snapshot {}: {}", path.display(), e))
    })?;
    let stations: Vec<Station> = serde_json::from_str(&content)?;

    tracing::debug!(path = %path.display(), stations = stations.len(), "Loaded station snapshot");
    Ok(MemoryStationStore::from_stations(stations))
}

/// Write every station in `store` as a pretty-printed JSON array
pub fn save_snapshot(store: &MemoryStationStore, path: &Path) -> Result<usize> {
    let stations = store.snapshot();
    let json = serde_json::to_string_pretty(&stations)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;

    tracing::debug!(path = %path.display(), stations = stations.len(), "Saved station snapshot");
    Ok(stations.len())
}
