use std::collections::BTreeMap;

use crate::{Query, ResolvedPosition, Track, TrackIndex, VesselId};

/// Last known report of every vessel in scope of `query`.
///
/// Each track is searched with a binary search, so a query costs O(log n) per vessel. Vessels
/// without a report inside their window are absent from the result.
pub fn resolve(index: &TrackIndex, query: &Query) -> BTreeMap<VesselId, ResolvedPosition> {
    scoped_tracks(index, query)
        .filter_map(|track| {
            let window = query.window_for(track.vessel_id());
            track.latest_in(&window).map(|report| {
                (
                    track.vessel_id().clone(),
                    ResolvedPosition {
                        report: report.clone(),
                        color: track.color(),
                    },
                )
            })
        })
        .collect()
}

/// Tracks a query applies to, in first-seen order.
pub(crate) fn scoped_tracks<'a>(
    index: &'a TrackIndex,
    query: &'a Query,
) -> Box<dyn Iterator<Item = &'a Track> + 'a> {
    match &query.focus {
        Some(focus) => Box::new(index.get(&focus.vessel_id).into_iter()),
        None => Box::new(index.tracks()),
    }
}
