use std::path::PathBuf;

use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to read '{}'", path.display()))]
    Io {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Failed to parse JSON in '{}'", path.display()))]
    Json {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Failed to parse CSV in '{}'", path.display()))]
    Csv {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: csv::Error,
    },
    #[snafu(display("File '{}' is neither GeoJSON nor CSV", path.display()))]
    UnsupportedFormat {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
    },
    #[snafu(display("Invalid playback instant"))]
    Instant {
        #[snafu(implicit)]
        location: Location,
        source: playback_core::NormalizationError,
    },
    #[snafu(display("Duration is out of range"))]
    DurationRange {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: chrono::OutOfRangeError,
    },
}
