use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Color, Coordinates};

/// The vessel's MMSI, kept as text since sources disagree on whether it is a number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VesselId(String);

/// One normalized AIS sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub vessel_id: VesselId,
    pub instant: DateTime<Utc>,
    pub coordinates: Coordinates,
    pub course_over_ground: f64,
    /// Descriptive properties (name, speed, destination, ship type, ...) forwarded untouched.
    pub attributes: Map<String, Value>,
}

/// A position report as handed over by a source, before any validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPositionRecord {
    pub mmsi: Option<String>,
    pub timestamp: Option<String>,
    /// `[longitude, latitude]`
    pub coordinates: Option<[f64; 2]>,
    pub course_over_ground: Option<String>,
    pub attributes: Map<String, Value>,
}

/// Last known state of a vessel at-or-before a query instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPosition {
    #[serde(flatten)]
    pub report: PositionReport,
    pub color: Color,
}

impl VesselId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for VesselId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VesselId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Display for VesselId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ResolvedPosition {
    pub fn vessel_id(&self) -> &VesselId {
        &self.report.vessel_id
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.report.instant
    }
}

#[cfg(feature = "test")]
mod test {
    use rand::random;

    use super::*;

    impl PositionReport {
        pub fn test_default(vessel_id: &str, instant: DateTime<Utc>) -> PositionReport {
            PositionReport {
                vessel_id: VesselId::new(vessel_id),
                instant,
                coordinates: Coordinates::new(10.5 + random::<f64>(), 54.5 + random::<f64>()),
                course_over_ground: random::<f64>() * 360.,
                attributes: Map::new(),
            }
        }
    }

    impl RawPositionRecord {
        pub fn test_default(mmsi: &str, timestamp: &str) -> RawPositionRecord {
            let mut attributes = Map::new();
            attributes.insert("name".into(), Value::String("test_vessel".into()));
            attributes.insert("sog".into(), Value::String("8.4".into()));

            RawPositionRecord {
                mmsi: Some(mmsi.to_string()),
                timestamp: Some(timestamp.to_string()),
                coordinates: Some([11.2, 54.6]),
                course_over_ground: Some("123.3".to_string()),
                attributes,
            }
        }
    }
}
