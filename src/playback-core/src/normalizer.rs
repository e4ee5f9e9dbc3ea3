use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use itertools::Itertools;
use tracing::{instrument, warn};

use crate::{
    Coordinates, DropReason, IdentityField, NormalizationError, PositionReport, RawPositionRecord,
    VesselId,
    normalization_error::{InvalidTimestampSnafu, MissingIdentitySnafu},
};

static ISO_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
static ISO_DATE_FORMAT: &str = "%Y-%m-%d";
static SLASH_FORMAT: &str = "%d/%m/%Y %H:%M:%S%.f";

/// Output of normalizing a batch of raw records. Dropped records are reported, never silently
/// discarded.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub reports: Vec<PositionReport>,
    pub dropped: Vec<DroppedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    /// Position of the record in the input batch.
    pub index: usize,
    pub reason: DropReason,
    pub message: String,
}

/// Parses an AIS timestamp into UTC.
///
/// ISO-8601-like values are tried first. A trailing `Z` or `±HH:MM` is stripped and the remaining
/// wall clock time is read as UTC. Values that are not ISO are read as `DD/MM/YYYY HH:MM:SS`.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, NormalizationError> {
    let trimmed = value.trim();
    parse_iso(trimmed)
        .or_else(|| parse_slash_delimited(trimmed))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| InvalidTimestampSnafu { value }.build())
}

pub fn normalize(raw: RawPositionRecord) -> Result<PositionReport, NormalizationError> {
    let RawPositionRecord {
        mmsi,
        timestamp,
        coordinates,
        course_over_ground,
        attributes,
    } = raw;

    let vessel_id = mmsi
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(VesselId::new)
        .ok_or_else(|| {
            MissingIdentitySnafu {
                field: IdentityField::VesselId,
            }
            .build()
        })?;

    let coordinates = coordinates
        .map(Coordinates::from)
        .filter(Coordinates::is_finite)
        .ok_or_else(|| {
            MissingIdentitySnafu {
                field: IdentityField::Coordinates,
            }
            .build()
        })?;

    let instant = match timestamp {
        Some(timestamp) => parse_timestamp(&timestamp)?,
        None => return InvalidTimestampSnafu { value: "" }.fail(),
    };

    Ok(PositionReport {
        vessel_id,
        instant,
        coordinates,
        course_over_ground: course_over_ground
            .as_deref()
            .map(parse_course)
            .unwrap_or_default(),
        attributes,
    })
}

#[instrument(skip_all, fields(app.num_records, app.num_dropped))]
pub fn normalize_batch<T>(records: T) -> NormalizedBatch
where
    T: IntoIterator<Item = RawPositionRecord>,
{
    let mut batch = NormalizedBatch::default();
    let mut num_records = 0;

    for (index, raw) in records.into_iter().enumerate() {
        num_records += 1;
        match normalize(raw) {
            Ok(report) => batch.reports.push(report),
            Err(e) => {
                warn!("dropping ais record {index}: {e}");
                batch.dropped.push(DroppedRecord {
                    index,
                    reason: e.reason(),
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::Span::current().record("app.num_records", num_records);
    tracing::Span::current().record("app.num_dropped", batch.dropped.len());

    batch
}

impl NormalizedBatch {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    pub fn drop_counts(&self) -> HashMap<DropReason, usize> {
        self.dropped.iter().map(|d| d.reason).counts()
    }
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    let value = strip_zone(value);
    ISO_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn parse_slash_delimited(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, SLASH_FORMAT).ok()
}

fn strip_zone(value: &str) -> &str {
    if let Some(stripped) = value.strip_suffix(['Z', 'z']) {
        return stripped;
    }

    let bytes = value.as_bytes();
    if bytes.len() >= 6 {
        let split = bytes.len() - 6;
        let offset = &bytes[split..];
        let is_offset = matches!(offset[0], b'+' | b'-')
            && offset[3] == b':'
            && offset[1..3].iter().all(u8::is_ascii_digit)
            && offset[4..].iter().all(u8::is_ascii_digit);
        if is_offset {
            return &value[..split];
        }
    }

    value
}

fn parse_course(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or_default()
}
