use chrono::Duration;
use serde::Serialize;

use crate::{Query, ResolvedPosition, VesselId};

/// Splits resolved positions into vessels reporting close to the query instant and vessels
/// whose last report is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSetClassifier {
    pub tolerance: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActiveSet {
    pub active: Vec<ResolvedPosition>,
    /// Stale vessels, closest to the query instant first.
    pub other: Vec<ResolvedPosition>,
}

impl Default for ActiveSetClassifier {
    fn default() -> Self {
        ActiveSetClassifier {
            tolerance: Duration::seconds(60),
        }
    }
}

impl ActiveSetClassifier {
    pub fn new(tolerance: Duration) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// Both lists are ordered by absolute distance to `query.instant`. Input iteration order
    /// breaks ties, which for a resolver result means ascending vessel id.
    pub fn classify<T>(&self, resolved: T, query: &Query) -> ActiveSet
    where
        T: IntoIterator<Item = (VesselId, ResolvedPosition)>,
    {
        let distance = |p: &ResolvedPosition| (p.instant() - query.instant).abs();

        let (mut active, mut other): (Vec<_>, Vec<_>) = resolved
            .into_iter()
            .map(|(_, p)| p)
            .partition(|p| distance(p) <= self.tolerance);

        active.sort_by_key(|p| distance(p));
        other.sort_by_key(|p| distance(p));

        ActiveSet { active, other }
    }
}

impl ActiveSet {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.other.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.other.len()
    }
}
