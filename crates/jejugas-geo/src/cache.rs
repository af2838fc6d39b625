use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use jejugas_core::models::{KatecPoint, WgsPoint};

/// Memo of resolution outcomes keyed by source coordinate.
///
/// Misses are cached too (`None`), so an unresolvable coordinate is only
/// attempted once per process. Entries are never evicted; the key space is
/// the station set.
#[derive(Debug, Default)]
pub struct CoordinateCache {
    entries: RwLock<HashMap<String, Option<WgsPoint>>>,
}

impl CoordinateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome; the outer `None` means "never attempted"
    pub fn get(&self, katec: &KatecPoint) -> Option<Option<WgsPoint>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&katec.cache_key()).copied()
    }

    /// Record an outcome unless one is already present, returning the stored value.
    ///
    /// Concurrent resolutions of the same key keep whichever finished first.
    pub fn insert(&self, katec: &KatecPoint, outcome: Option<WgsPoint>) -> Option<WgsPoint> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *entries.entry(katec.cache_key()).or_insert(outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
