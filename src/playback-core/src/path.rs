use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    Color, Coordinates, Query, TimeWindow, Track, TrackIndex, VesselId, resolver::scoped_tracks,
};

/// Recent movement of a vessel, ready to be drawn as a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub vessel_id: VesselId,
    pub coordinates: Vec<Coordinates>,
    pub start_instant: Option<DateTime<Utc>>,
    pub end_instant: Option<DateTime<Utc>>,
    pub color: Color,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }
}

/// The part of `track` inside `window` as an ordered coordinate sequence. An empty window
/// yields an empty path.
pub fn build_path(track: &Track, window: &TimeWindow) -> Path {
    let reports = track.within(window);

    Path {
        vessel_id: track.vessel_id().clone(),
        coordinates: reports.iter().map(|r| r.coordinates).collect(),
        start_instant: reports.first().map(|r| r.instant),
        end_instant: reports.last().map(|r| r.instant),
        color: track.color(),
    }
}

/// Non-empty paths of every vessel in scope of `query`, in first-seen order.
pub fn paths(index: &TrackIndex, query: &Query) -> Vec<Path> {
    scoped_tracks(index, query)
        .map(|track| build_path(track, &query.window_for(track.vessel_id())))
        .filter(|path| !path.is_empty())
        .collect()
}
