use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{TimeWindowError, time_window_error::OrderingSnafu};

/// Inclusive time range, optionally unbounded at the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<TimeWindow, TimeWindowError> {
        if start > end {
            OrderingSnafu { start, end }.fail()
        } else {
            Ok(TimeWindow {
                start: Some(start),
                end,
            })
        }
    }

    pub fn upto(end: DateTime<Utc>) -> TimeWindow {
        TimeWindow { start: None, end }
    }

    /// Window covering `duration` before `end`. A duration too large to subtract from `end`
    /// leaves the start unbounded.
    pub fn trailing(end: DateTime<Utc>, duration: Duration) -> TimeWindow {
        TimeWindow {
            start: end.checked_sub_signed(duration.abs()),
            end,
        }
    }

    /// Moves the end of the window while keeping its start. An end before the start yields a
    /// window containing nothing.
    pub(crate) fn with_end(self, end: DateTime<Utc>) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end,
        }
    }

    pub fn contains(&self, val: DateTime<Utc>) -> bool {
        val <= self.end && self.start.is_none_or(|start| val >= start)
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}
