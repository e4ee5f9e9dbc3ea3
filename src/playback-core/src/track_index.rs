use std::collections::{HashMap, hash_map::Entry};

use chrono::{DateTime, Utc};

use crate::{Color, PositionReport, TimeWindow, VesselId};

/// One vessel's reports in ascending time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    vessel_id: VesselId,
    rank: usize,
    reports: Vec<PositionReport>,
}

/// All tracks of a report batch, keyed by vessel.
///
/// The index is rebuilt from scratch whenever the underlying reports change and is never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackIndex {
    tracks: HashMap<VesselId, Track>,
    /// Vessels in the order they were first seen in the input.
    discovery: Vec<VesselId>,
}

impl Track {
    pub fn vessel_id(&self) -> &VesselId {
        &self.vessel_id
    }

    /// Position of this vessel in first-seen order over the whole batch.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn color(&self) -> Color {
        Color::for_rank(self.rank)
    }

    pub fn reports(&self) -> &[PositionReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn first(&self) -> Option<&PositionReport> {
        self.reports.first()
    }

    pub fn last(&self) -> Option<&PositionReport> {
        self.reports.last()
    }

    /// The last report inside `window`, found by binary search. Among reports sharing the same
    /// instant the one inserted last wins.
    pub fn latest_in(&self, window: &TimeWindow) -> Option<&PositionReport> {
        let end = self.upper(window.end());
        let latest = self.reports[..end].last()?;
        window.contains(latest.instant).then_some(latest)
    }

    /// All reports inside `window`, in ascending time order.
    pub fn within(&self, window: &TimeWindow) -> &[PositionReport] {
        let end = self.upper(window.end());
        let start = window
            .start()
            .map(|start| self.reports.partition_point(|r| r.instant < start))
            .unwrap_or(0);

        if start >= end {
            &[]
        } else {
            &self.reports[start..end]
        }
    }

    fn upper(&self, end: DateTime<Utc>) -> usize {
        self.reports.partition_point(|r| r.instant <= end)
    }
}

impl TrackIndex {
    pub fn build<T>(reports: T) -> TrackIndex
    where
        T: IntoIterator<Item = PositionReport>,
    {
        let mut tracks: HashMap<VesselId, Track> = HashMap::new();
        let mut discovery = Vec::new();

        for report in reports {
            match tracks.entry(report.vessel_id.clone()) {
                Entry::Occupied(mut e) => e.get_mut().reports.push(report),
                Entry::Vacant(e) => {
                    discovery.push(report.vessel_id.clone());
                    e.insert(Track {
                        vessel_id: report.vessel_id.clone(),
                        rank: discovery.len() - 1,
                        reports: vec![report],
                    });
                }
            }
        }

        // `sort_by_key` is stable, reports with equal instants keep their input order.
        for track in tracks.values_mut() {
            track.reports.sort_by_key(|r| r.instant);
        }

        TrackIndex { tracks, discovery }
    }

    pub fn get(&self, vessel_id: &VesselId) -> Option<&Track> {
        self.tracks.get(vessel_id)
    }

    /// Tracks in first-seen order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.discovery.iter().filter_map(|id| self.tracks.get(id))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn rank(&self, vessel_id: &VesselId) -> Option<usize> {
        self.get(vessel_id).map(Track::rank)
    }

    pub fn color(&self, vessel_id: &VesselId) -> Option<Color> {
        self.get(vessel_id).map(Track::color)
    }

    pub fn num_reports(&self) -> usize {
        self.tracks.values().map(Track::len).sum()
    }

    pub fn earliest_instant(&self) -> Option<DateTime<Utc>> {
        self.tracks
            .values()
            .filter_map(|t| t.first().map(|r| r.instant))
            .min()
    }

    pub fn latest_instant(&self) -> Option<DateTime<Utc>> {
        self.tracks
            .values()
            .filter_map(|t| t.last().map(|r| r.instant))
            .max()
    }
}
