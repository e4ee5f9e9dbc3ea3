use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{TimeWindow, VesselId};

/// A single point-in-time lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub instant: DateTime<Utc>,
    /// Reports older than `instant - window` are ignored.
    pub window: Option<Duration>,
    pub focus: Option<Focus>,
}

/// Restricts a query to one vessel, optionally scrubbing that vessel independently of the
/// query instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Focus {
    pub vessel_id: VesselId,
    pub as_of: Option<DateTime<Utc>>,
}

impl Query {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            window: None,
            focus: None,
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_focus(mut self, vessel_id: VesselId, as_of: Option<DateTime<Utc>>) -> Self {
        self.focus = Some(Focus { vessel_id, as_of });
        self
    }

    /// The window anchored at the query instant.
    pub fn window(&self) -> TimeWindow {
        match self.window {
            Some(window) => TimeWindow::trailing(self.instant, window),
            None => TimeWindow::upto(self.instant),
        }
    }

    /// The window to apply to `vessel_id`'s track. The start stays anchored at the query
    /// instant, only a focus `as_of` moves the end.
    pub fn window_for(&self, vessel_id: &VesselId) -> TimeWindow {
        let window = self.window();
        match &self.focus {
            Some(Focus {
                vessel_id: focused,
                as_of: Some(as_of),
            }) if focused == vessel_id => window.with_end(*as_of),
            _ => window,
        }
    }

    pub fn is_in_scope(&self, vessel_id: &VesselId) -> bool {
        self.focus
            .as_ref()
            .is_none_or(|focus| &focus.vessel_id == vessel_id)
    }
}
