use std::{path::PathBuf, str::FromStr, time::Duration};

use config::{Config, ConfigError, File};
use playback_core::{Coordinates, Subarea};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log_level: LogLevel,
    pub environment: Environment,
    pub source: SourceSettings,
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub subareas: Vec<SubareaSettings>,
    pub event_buffer_size: usize,
    pub broadcast_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// JSON array of data file names, resolved relative to the manifest itself.
    pub manifest: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackSettings {
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,
    #[serde(default, with = "humantime_serde")]
    pub window: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub active_tolerance: Duration,
    /// Defaults to the most recent report once data is loaded.
    pub query_instant: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubareaSettings {
    pub id: String,
    pub name: Option<String>,
    pub polygon: Vec<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::EnumString, strum::AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    Local,
    Development,
    Production,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into());
        let environment = Environment::from_str(&environment).map_err(|e| {
            ConfigError::Message(format!("invalid APP_ENVIRONMENT '{environment}': {e}"))
        })?;

        Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.as_ref().to_lowercase()))
                    .required(true),
            )
            .add_source(config::Environment::with_prefix("AIS_PLAYBACK").separator("__"))
            .set_override("environment", environment.as_ref())?
            .build()?
            .try_deserialize()
    }

    pub fn subareas(&self) -> Vec<Subarea> {
        self.subareas
            .iter()
            .map(|s| Subarea::new(s.id.clone(), s.name.clone(), &s.polygon))
            .collect()
    }
}

impl From<&LogLevel> for tracing::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl Settings {
        pub fn test_default(manifest: impl Into<PathBuf>) -> Settings {
            Settings {
                log_level: LogLevel::Debug,
                environment: Environment::Test,
                source: SourceSettings {
                    manifest: manifest.into(),
                },
                playback: PlaybackSettings {
                    refresh_interval: Duration::from_secs(60),
                    window: None,
                    active_tolerance: Duration::from_secs(60),
                    query_instant: None,
                },
                subareas: vec![],
                event_buffer_size: 10,
                broadcast_buffer_size: 10,
            }
        }
    }
}
