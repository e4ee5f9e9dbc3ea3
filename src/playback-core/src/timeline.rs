use chrono::{DateTime, Utc};

use crate::{Focus, TimeWindow, Track, VesselId};

/// Scrubbing state for one vessel's path.
///
/// The timeline starts at the most recent instant, [PathTimeline::step] plays forward one
/// report at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTimeline {
    vessel_id: VesselId,
    instants: Vec<DateTime<Utc>>,
    cursor: usize,
}

impl PathTimeline {
    /// Returns `None` when `track` has no reports inside `window`.
    pub fn new(track: &Track, window: &TimeWindow) -> Option<Self> {
        let mut instants: Vec<_> = track.within(window).iter().map(|r| r.instant).collect();
        instants.dedup();

        let cursor = instants.len().checked_sub(1)?;

        Some(Self {
            vessel_id: track.vessel_id().clone(),
            instants,
            cursor,
        })
    }

    pub fn vessel_id(&self) -> &VesselId {
        &self.vessel_id
    }

    pub fn instants(&self) -> &[DateTime<Utc>] {
        &self.instants
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> DateTime<Utc> {
        self.instants[self.cursor]
    }

    /// Moves to `index`, clamped to the last instant.
    pub fn seek(&mut self, index: usize) -> DateTime<Utc> {
        self.cursor = index.min(self.instants.len() - 1);
        self.current()
    }

    /// Advances one instant, `None` once the end has been reached.
    pub fn step(&mut self) -> Option<DateTime<Utc>> {
        if self.is_at_end() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 >= self.instants.len()
    }

    /// A focus scrubbing the vessel to the current instant.
    pub fn focus(&self) -> Focus {
        Focus {
            vessel_id: self.vessel_id.clone(),
            as_of: Some(self.current()),
        }
    }
}
