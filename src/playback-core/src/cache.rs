use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{PositionReport, VesselId};

/// Identifies one report of one vessel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportKey {
    pub vessel_id: VesselId,
    pub instant: DateTime<Utc>,
}

/// Values derived from a single report, such as a built path or an external analysis result.
///
/// Eviction policy: unbounded. Entries live until [ReportCache::clear] is called or the cache is
/// dropped, owners are expected to clear it whenever the report collection is rebuilt.
#[derive(Debug, Clone)]
pub struct ReportCache<V> {
    entries: HashMap<ReportKey, V>,
}

impl ReportKey {
    pub fn new(vessel_id: VesselId, instant: DateTime<Utc>) -> Self {
        Self { vessel_id, instant }
    }
}

impl From<&PositionReport> for ReportKey {
    fn from(value: &PositionReport) -> Self {
        Self::new(value.vessel_id.clone(), value.instant)
    }
}

impl<V> Default for ReportCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> ReportCache<V> {
    pub fn get(&self, key: &ReportKey) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &ReportKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: ReportKey, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn get_or_insert_with<F>(&mut self, key: ReportKey, f: F) -> &V
    where
        F: FnOnce() -> V,
    {
        self.entries.entry(key).or_insert_with(f)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
