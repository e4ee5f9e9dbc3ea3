use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;
use playback_core::{FeatureCollection, RawPositionRecord};
use serde::Deserialize;
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};
use tracing::{error, info, instrument, warn};

use crate::error::{
    Result,
    error::{CsvSnafu, IoSnafu, JsonSnafu, UnsupportedFormatSnafu},
};

/// Where raw position records come from.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn records(&self) -> Result<Vec<RawPositionRecord>>;
}

/// Loads every data file listed in a JSON manifest.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    manifest: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    GeoJson,
    Csv,
}

/// One row of an AIS CSV export.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "Timestamp")]
    timestamp: Option<String>,
    #[serde(rename = "MMSI")]
    mmsi: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: Option<String>,
    #[serde(rename = "Longitude")]
    longitude: Option<String>,
    #[serde(rename = "COG")]
    course_over_ground: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Ship type")]
    ship_type: Option<String>,
    #[serde(rename = "Navigational status")]
    status: Option<String>,
    #[serde(rename = "SOG")]
    speed_over_ground: Option<String>,
    #[serde(rename = "Destination")]
    destination: Option<String>,
    #[serde(rename = "ETA")]
    eta: Option<String>,
}

impl ManifestSource {
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
        }
    }

    async fn files(&self) -> Result<Vec<PathBuf>> {
        let bytes = tokio::fs::read(&self.manifest).await.context(IoSnafu {
            path: &self.manifest,
        })?;
        let names: Vec<String> = serde_json::from_slice(&bytes).context(JsonSnafu {
            path: &self.manifest,
        })?;

        let base = self.manifest.parent().unwrap_or_else(|| Path::new(""));
        Ok(names.into_iter().map(|name| base.join(name)).collect())
    }
}

#[async_trait]
impl PositionSource for ManifestSource {
    #[instrument(skip_all, fields(app.manifest = %self.manifest.display()))]
    async fn records(&self) -> Result<Vec<RawPositionRecord>> {
        let files = self.files().await?;
        let loaded = join_all(files.iter().map(|path| load_file(path))).await;

        let mut records = Vec::new();
        for (path, result) in files.iter().zip(loaded) {
            match result {
                Ok(r) => records.extend(r),
                Err(e) => error!("failed to load '{}': {e:?}", path.display()),
            }
        }

        info!(
            "loaded {} records from {} files",
            records.len(),
            files.len()
        );

        Ok(records)
    }
}

impl SourceFormat {
    fn from_path(path: &Path) -> Option<SourceFormat> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" | "geojson" => Some(SourceFormat::GeoJson),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<Vec<RawPositionRecord>> {
        match self {
            SourceFormat::GeoJson => {
                let collection: FeatureCollection =
                    serde_json::from_slice(bytes).context(JsonSnafu { path })?;
                Ok(collection.into())
            }
            SourceFormat::Csv => {
                let mut reader = csv::Reader::from_reader(bytes);
                reader.headers().context(CsvSnafu { path })?;

                let records = reader
                    .deserialize::<CsvRow>()
                    .enumerate()
                    .filter_map(|(index, row)| match row {
                        Ok(row) => Some(RawPositionRecord::from(row)),
                        Err(e) => {
                            warn!("skipping csv row {index} in '{}': {e}", path.display());
                            None
                        }
                    })
                    .collect();

                Ok(records)
            }
        }
    }
}

async fn load_file(path: &Path) -> Result<Vec<RawPositionRecord>> {
    let format = SourceFormat::from_path(path).context(UnsupportedFormatSnafu { path })?;
    let bytes = tokio::fs::read(path).await.context(IoSnafu { path })?;
    format.parse(path, &bytes)
}

impl From<CsvRow> for RawPositionRecord {
    fn from(value: CsvRow) -> Self {
        let CsvRow {
            timestamp,
            mmsi,
            latitude,
            longitude,
            course_over_ground,
            name,
            ship_type,
            status,
            speed_over_ground,
            destination,
            eta,
        } = value;

        let parse = |v: Option<String>| v.and_then(|v| v.trim().parse::<f64>().ok());
        let coordinates = match (parse(longitude), parse(latitude)) {
            (Some(longitude), Some(latitude)) => Some([longitude, latitude]),
            _ => None,
        };

        let attributes: Map<String, Value> = [
            ("name", name),
            ("shipType", ship_type),
            ("status", status),
            ("sog", speed_over_ground),
            ("destination", destination),
            ("eta", eta),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), Value::String(v))))
        .collect();

        RawPositionRecord {
            mmsi,
            timestamp,
            coordinates,
            course_over_ground,
            attributes,
        }
    }
}
