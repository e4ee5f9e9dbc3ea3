use std::{sync::atomic::Ordering, time::Duration};

use ais_playback::{
    playback::{PlaybackEvent, Snapshot},
    settings::{Environment, Settings},
};
use chrono::{DateTime, TimeZone, Utc};
use playback_core::{Color, VesselId};
use tokio::sync::broadcast::{Receiver, error::RecvError};

use crate::helper::{TestHelper, scenario_records};

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 21, h, m, 0).unwrap()
}

async fn next_snapshot(receiver: &mut Receiver<Snapshot>) -> Snapshot {
    loop {
        match receiver.recv().await {
            Ok(snapshot) => return snapshot,
            Err(RecvError::Lagged(_)) => continue,
            Err(e) => panic!("snapshot channel failed: {e:?}"),
        }
    }
}

#[tokio::test]
async fn test_run_single_classifies_latest_positions() {
    let helper = TestHelper::new(Settings::test_default("unused.json"), scenario_records());
    let mut snapshots = helper.app.subscribe();

    let snapshot = helper.app.run_single().await.unwrap();

    assert_eq!(snapshot.instant, Some(at(10, 10)));
    assert_eq!(snapshot.active.len(), 1);
    assert_eq!(snapshot.active[0].vessel_id().as_str(), "100");
    assert_eq!(snapshot.active[0].color, Color::for_rank(0));
    assert_eq!(snapshot.other.len(), 1);
    assert_eq!(snapshot.other[0].vessel_id().as_str(), "200");
    assert_eq!(snapshot.paths.len(), 2);
    assert_eq!(snapshot.paths[0].len(), 3);
    assert_eq!(snapshot.dropped.get("invalid_timestamp"), Some(&1));

    assert_eq!(snapshots.recv().await.unwrap(), snapshot);
    assert_eq!(helper.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_configured_instant_and_window_limit_positions() {
    let mut settings = Settings::test_default("unused.json");
    settings.playback.query_instant = Some("2025-03-21T10:07:00".into());
    settings.playback.window = Some(Duration::from_secs(30 * 60));

    let helper = TestHelper::new(settings, scenario_records());
    let snapshot = helper.app.run_single().await.unwrap();

    assert_eq!(snapshot.instant, Some(at(10, 7)));
    assert!(snapshot.active.is_empty());
    assert_eq!(snapshot.other.len(), 1);
    assert_eq!(snapshot.other[0].instant(), at(10, 5));
    assert_eq!(snapshot.window.unwrap().start(), Some(at(9, 37)));
}

#[tokio::test]
async fn test_pending_events_are_applied_before_snapshot() {
    let helper = TestHelper::new(Settings::test_default("unused.json"), scenario_records());

    helper
        .events
        .send(PlaybackEvent::VesselSelected {
            vessel_id: VesselId::new("100"),
        })
        .await
        .unwrap();
    helper
        .events
        .send(PlaybackEvent::PathTimeChanged {
            vessel_id: VesselId::new("100"),
            instant: at(10, 5),
        })
        .await
        .unwrap();

    let snapshot = helper.app.run_single().await.unwrap();

    let focus = snapshot.focus.unwrap();
    assert_eq!(focus.focus.vessel_id, VesselId::new("100"));
    assert_eq!(focus.focus.as_of, Some(at(10, 5)));
    assert_eq!(focus.cursor, 1);
    assert_eq!(focus.timeline, vec![at(10, 0), at(10, 5), at(10, 10)]);
    assert_eq!(focus.path.len(), 2);
    assert_eq!(snapshot.paths.len(), 1);
    assert_eq!(snapshot.other.len(), 1);
}

#[tokio::test]
async fn test_snapshot_serializes_as_camel_case() {
    let helper = TestHelper::new(Settings::test_default("unused.json"), scenario_records());
    let snapshot = helper.app.run_single().await.unwrap();

    let value = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(value["active"][0]["vesselId"], "100");
    assert_eq!(value["active"][0]["coordinates"][0], 11.2);
    assert_eq!(value["paths"][0]["color"], "#ff0000");
    assert!(value["paths"][0]["startInstant"].is_string());
}

#[tokio::test]
async fn test_continuous_run_refreshes_and_publishes() {
    let mut settings = Settings::test_default("unused.json");
    settings.environment = Environment::Local;
    settings.playback.refresh_interval = Duration::from_millis(10);

    let helper = TestHelper::new(settings, scenario_records());
    let mut snapshots = helper.app.subscribe();
    let events = helper.events.clone();
    let loads = helper.loads.clone();

    let handle = tokio::spawn(helper.app.run());

    let first = next_snapshot(&mut snapshots).await;
    assert_eq!(first.instant, Some(at(10, 10)));

    events.send(PlaybackEvent::ClearAisData).await.unwrap();
    loop {
        let snapshot = next_snapshot(&mut snapshots).await;
        if snapshot.active.is_empty() && snapshot.other.is_empty() {
            break;
        }
    }

    while loads.load(Ordering::SeqCst) < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    handle.abort();
}

#[tokio::test]
async fn test_continuous_run_outlives_dropped_event_senders() {
    let mut settings = Settings::test_default("unused.json");
    settings.environment = Environment::Local;
    settings.playback.refresh_interval = Duration::from_millis(10);

    let helper = TestHelper::new(settings, scenario_records());
    let mut snapshots = helper.app.subscribe();
    let loads = helper.loads.clone();
    drop(helper.events);

    let handle = tokio::spawn(helper.app.run());

    while loads.load(Ordering::SeqCst) < 3 {
        next_snapshot(&mut snapshots).await;
    }
    assert!(!handle.is_finished());

    handle.abort();
}
