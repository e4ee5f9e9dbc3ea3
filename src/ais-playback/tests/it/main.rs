#![deny(warnings)]
#![deny(rust_2018_idioms)]

use ais_playback::settings::Settings;
use config::{Config, File};

pub mod helper;
pub mod playback;
pub mod source;

fn settings_are_valid(path: &str, environment: &str) {
    Config::builder()
        .add_source(File::with_name(path).required(true))
        .set_override("environment", environment)
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();
}

#[test]
fn test_local_settings_are_valid() {
    settings_are_valid("config/local.yml", "Local");
}

#[test]
fn test_development_settings_are_valid() {
    settings_are_valid("config/development.yml", "Development");
}

#[test]
fn test_production_settings_are_valid() {
    settings_are_valid("config/production.yml", "Production");
}

#[test]
fn test_test_settings_are_valid() {
    settings_are_valid("config/test.yml", "Test");
}
