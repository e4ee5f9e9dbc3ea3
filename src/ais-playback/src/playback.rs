use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use playback_core::{
    ActiveSetClassifier, Focus, NormalizedBatch, Path, PathTimeline, Query, ReportCache,
    ReportKey, ResolvedPosition, Subarea, TimeWindow, TrackIndex, VesselId, build_path, locate,
    paths, resolve,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// User interactions driving the playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A new tileset was selected, its time becomes the query instant.
    TilesetSelected { instant: DateTime<Utc> },
    VesselSelected { vessel_id: VesselId },
    /// The path scrubber of the selected vessel was moved.
    PathTimeChanged {
        vessel_id: VesselId,
        instant: DateTime<Utc>,
    },
    /// Advance the selected vessel one report.
    Step,
    FocusCleared,
    ClearAisData,
}

/// Everything a view needs to render the current playback state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub instant: Option<DateTime<Utc>>,
    pub window: Option<TimeWindow>,
    pub active: Vec<ResolvedPosition>,
    pub other: Vec<ResolvedPosition>,
    pub paths: Vec<Path>,
    pub focus: Option<FocusSnapshot>,
    /// Number of records dropped during normalization, per reason.
    pub dropped: BTreeMap<&'static str, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSnapshot {
    #[serde(flatten)]
    pub focus: Focus,
    pub subarea: Option<String>,
    pub timeline: Vec<DateTime<Utc>>,
    pub cursor: usize,
    pub path: Path,
}

/// Where the query instant comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackInstant {
    /// Follows the most recent report, recomputed on every index rebuild.
    Latest(Option<DateTime<Utc>>),
    /// Chosen by configuration or a tileset selection.
    Selected(DateTime<Utc>),
}

/// Playback state: the loaded tracks, the query instant and the selected vessel.
pub struct Playback {
    index: Arc<TrackIndex>,
    dropped: BTreeMap<&'static str, usize>,
    instant: PlaybackInstant,
    window: Option<Duration>,
    timeline: Option<PathTimeline>,
    classifier: ActiveSetClassifier,
    subareas: Vec<Subarea>,
    focus_paths: ReportCache<Path>,
}

impl Playback {
    pub fn new(
        instant: Option<DateTime<Utc>>,
        window: Option<Duration>,
        classifier: ActiveSetClassifier,
        subareas: Vec<Subarea>,
    ) -> Self {
        Self {
            index: Arc::new(TrackIndex::build(Vec::new())),
            dropped: BTreeMap::new(),
            instant: instant
                .map(PlaybackInstant::Selected)
                .unwrap_or(PlaybackInstant::Latest(None)),
            window,
            timeline: None,
            classifier,
            subareas,
            focus_paths: ReportCache::default(),
        }
    }

    pub fn index(&self) -> Arc<TrackIndex> {
        self.index.clone()
    }

    /// The query the next snapshot is computed from, `None` until an instant is known.
    pub fn query(&self) -> Option<Query> {
        let mut query = self.base_query()?;
        query.focus = self.timeline.as_ref().map(PathTimeline::focus);
        Some(query)
    }

    /// Swaps in freshly normalized data. The selected vessel is kept, at the same path
    /// instant, as long as it still has reports in the window.
    #[instrument(skip_all)]
    pub fn replace_index(&mut self, batch: NormalizedBatch) {
        self.dropped = batch
            .drop_counts()
            .into_iter()
            .map(|(reason, count)| (reason.as_str(), count))
            .collect();
        self.index = Arc::new(TrackIndex::build(batch.reports));
        self.focus_paths.clear();

        if let PlaybackInstant::Latest(latest) = &mut self.instant {
            *latest = self.index.latest_instant();
        }

        self.timeline = self
            .timeline
            .take()
            .and_then(|t| self.timeline_for(t.vessel_id(), Some(t.current())));

        info!(
            "indexed {} reports from {} vessels, dropped {}",
            self.index.num_reports(),
            self.index.len(),
            batch.dropped.len()
        );
    }

    #[instrument(skip(self))]
    pub fn apply(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::TilesetSelected { instant } => {
                self.instant = PlaybackInstant::Selected(instant);
                self.timeline = None;
                self.focus_paths.clear();
            }
            PlaybackEvent::VesselSelected { vessel_id } => {
                self.timeline = self.timeline_for(&vessel_id, None);
                if self.timeline.is_none() {
                    warn!("vessel {vessel_id} has no reports in the current window");
                }
            }
            PlaybackEvent::PathTimeChanged { vessel_id, instant } => match &mut self.timeline {
                Some(timeline) if timeline.vessel_id() == &vessel_id => {
                    seek_to(timeline, instant);
                }
                _ => warn!("path time changed for vessel {vessel_id} which is not selected"),
            },
            PlaybackEvent::Step => match self.timeline.as_mut().map(PathTimeline::step) {
                Some(Some(_)) => {}
                Some(None) => debug!("path timeline is at its end"),
                None => debug!("step without a selected vessel"),
            },
            PlaybackEvent::FocusCleared => self.timeline = None,
            PlaybackEvent::ClearAisData => {
                self.index = Arc::new(TrackIndex::build(Vec::new()));
                self.dropped.clear();
                self.timeline = None;
                self.focus_paths.clear();
            }
        }
    }

    pub fn snapshot(&mut self) -> Snapshot {
        let Some(query) = self.query() else {
            return Snapshot {
                instant: None,
                window: None,
                active: vec![],
                other: vec![],
                paths: vec![],
                focus: None,
                dropped: self.dropped.clone(),
            };
        };

        let resolved = resolve(&self.index, &query);
        let focus = query
            .focus
            .as_ref()
            .and_then(|focus| self.focus_snapshot(focus, &query, &resolved));
        let set = self.classifier.classify(resolved, &query);

        Snapshot {
            instant: Some(query.instant),
            window: Some(query.window()),
            active: set.active,
            other: set.other,
            paths: paths(&self.index, &query),
            focus,
            dropped: self.dropped.clone(),
        }
    }

    fn focus_snapshot(
        &mut self,
        focus: &Focus,
        query: &Query,
        resolved: &BTreeMap<VesselId, ResolvedPosition>,
    ) -> Option<FocusSnapshot> {
        let timeline = self.timeline.as_ref()?;
        let as_of = timeline.current();
        let instants = timeline.instants().to_vec();
        let cursor = timeline.cursor();

        let track = self.index.get(&focus.vessel_id)?;
        let path = self
            .focus_paths
            .get_or_insert_with(ReportKey::new(focus.vessel_id.clone(), as_of), || {
                build_path(track, &query.window_for(&focus.vessel_id))
            })
            .clone();

        let subarea = resolved
            .get(&focus.vessel_id)
            .and_then(|p| locate(&p.report.coordinates, &self.subareas))
            .map(|s| s.id.clone());

        Some(FocusSnapshot {
            focus: focus.clone(),
            subarea,
            timeline: instants,
            cursor,
            path,
        })
    }

    fn base_query(&self) -> Option<Query> {
        let query = Query::at(self.instant.get()?);
        Some(match self.window {
            Some(window) => query.with_window(window),
            None => query,
        })
    }

    fn timeline_for(
        &self,
        vessel_id: &VesselId,
        at: Option<DateTime<Utc>>,
    ) -> Option<PathTimeline> {
        let window = self.base_query()?.window();
        let mut timeline = PathTimeline::new(self.index.get(vessel_id)?, &window)?;
        if let Some(at) = at {
            seek_to(&mut timeline, at);
        }
        Some(timeline)
    }
}

impl PlaybackInstant {
    fn get(&self) -> Option<DateTime<Utc>> {
        match self {
            PlaybackInstant::Latest(latest) => *latest,
            PlaybackInstant::Selected(instant) => Some(*instant),
        }
    }
}

/// Moves to the latest instant not after `at`, or the first instant when `at` precedes them all.
fn seek_to(timeline: &mut PathTimeline, at: DateTime<Utc>) {
    let index = timeline
        .instants()
        .partition_point(|i| *i <= at)
        .saturating_sub(1);
    timeline.seek(index);
}
