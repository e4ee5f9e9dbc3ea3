use serde::Deserialize;
use serde_json::{Map, Value};

use super::RawPositionRecord;

static MMSI_PROPERTY: &str = "mmsi";
static TIMESTAMP_PROPERTY: &str = "timestamp";
static COURSE_PROPERTY: &str = "cog";

/// GeoJSON `FeatureCollection` of AIS point features.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl From<FeatureCollection> for Vec<RawPositionRecord> {
    fn from(value: FeatureCollection) -> Self {
        value
            .features
            .into_iter()
            .map(RawPositionRecord::from)
            .collect()
    }
}

impl From<Feature> for RawPositionRecord {
    fn from(value: Feature) -> Self {
        let Feature {
            geometry,
            mut properties,
        } = value;

        let coordinates = geometry.and_then(|g| match g.coordinates.as_slice() {
            [longitude, latitude, ..] => Some([*longitude, *latitude]),
            _ => None,
        });

        RawPositionRecord {
            mmsi: properties.remove(MMSI_PROPERTY).and_then(scalar_text),
            timestamp: properties.remove(TIMESTAMP_PROPERTY).and_then(scalar_text),
            coordinates,
            course_over_ground: properties.remove(COURSE_PROPERTY).and_then(scalar_text),
            attributes: properties,
        }
    }
}

// Sources emit MMSI and course both as JSON strings and as JSON numbers.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(v) => Some(v),
        Value::Number(v) => Some(v.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}
