use std::fs;

use ais_playback::{
    settings::Settings,
    source::{ManifestSource, PositionSource},
    startup::App,
};
use tempfile::TempDir;

static GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [11.2, 54.6] },
            "properties": { "mmsi": 219000001, "timestamp": "2025-03-21T11:45:00Z", "cog": 90.5, "name": "FERRY" }
        },
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [11.3, 54.6] },
            "properties": { "mmsi": "219000001", "timestamp": "2025-03-21T11:46:00+01:00" }
        }
    ]
}"#;

static CSV: &str = "\
Timestamp,MMSI,Latitude,Longitude,COG,Name,Ship type,Navigational status,SOG,Destination,ETA
21/03/2025 11:40:00,219000002,54.5,11.1,12.0,TUG,Tug,Under way,3.1,RODBY,
21/03/2025 11:41:00,,54.5,11.1,12.0,TUG,Tug,Under way,3.1,RODBY,
";

fn write_data(manifest: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ferry.json"), GEOJSON).unwrap();
    fs::write(dir.path().join("tug.csv"), CSV).unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("manifest.json"), manifest).unwrap();
    dir
}

#[tokio::test]
async fn test_manifest_files_are_merged_in_manifest_order() {
    let dir = write_data(r#"["tug.csv", "ferry.json"]"#);

    let records = ManifestSource::new(dir.path().join("manifest.json"))
        .records()
        .await
        .unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].mmsi.as_deref(), Some("219000002"));
    assert_eq!(records[1].mmsi, None);
    assert_eq!(records[2].mmsi.as_deref(), Some("219000001"));
    assert_eq!(records[2].course_over_ground.as_deref(), Some("90.5"));
}

#[tokio::test]
async fn test_failing_files_are_skipped() {
    let dir = write_data(r#"["broken.json", "missing.json", "image.tif", "ferry.json"]"#);

    let records = ManifestSource::new(dir.path().join("manifest.json"))
        .records()
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_missing_manifest_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = ManifestSource::new(dir.path().join("manifest.json"))
        .records()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_app_replays_manifest_data() {
    let dir = write_data(r#"["ferry.json", "tug.csv"]"#);
    let app = App::build(&Settings::test_default(dir.path().join("manifest.json")))
        .await
        .unwrap();

    let snapshot = app.run_single().await.unwrap();

    assert_eq!(snapshot.dropped.get("missing_identity"), Some(&1));
    assert_eq!(
        snapshot
            .active
            .iter()
            .map(|p| p.vessel_id().as_str())
            .collect::<Vec<_>>(),
        vec!["219000001"]
    );
    assert_eq!(snapshot.other.len(), 1);
    assert_eq!(snapshot.other[0].vessel_id().as_str(), "219000002");
    assert_eq!(snapshot.paths[0].len(), 2);
}
