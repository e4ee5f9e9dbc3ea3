use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use ais_playback::{
    error::Result, playback::PlaybackEvent, settings::Settings, source::PositionSource,
    startup::App,
};
use async_channel::Sender;
use async_trait::async_trait;
use playback_core::RawPositionRecord;

/// In-memory source handing out the same records on every load.
#[derive(Clone, Default)]
pub struct StaticSource {
    records: Vec<RawPositionRecord>,
    loads: Arc<AtomicUsize>,
}

pub struct TestHelper {
    pub app: App,
    pub events: Sender<PlaybackEvent>,
    pub loads: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(records: Vec<RawPositionRecord>) -> Self {
        Self {
            records,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl PositionSource for StaticSource {
    async fn records(&self) -> Result<Vec<RawPositionRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }
}

impl TestHelper {
    pub fn new(settings: Settings, records: Vec<RawPositionRecord>) -> TestHelper {
        let source = StaticSource::new(records);
        let loads = source.loads.clone();
        let app = App::with_source(&settings, source).unwrap();
        let events = app.events();

        TestHelper { app, events, loads }
    }
}

/// Two vessels 100 and 200 as in the canonical playback scenario, plus one record without a
/// timestamp.
pub fn scenario_records() -> Vec<RawPositionRecord> {
    let mut missing = RawPositionRecord::test_default("300", "");
    missing.timestamp = None;

    vec![
        RawPositionRecord::test_default("100", "2025-03-21T10:00:00Z"),
        RawPositionRecord::test_default("100", "2025-03-21T10:05:00Z"),
        RawPositionRecord::test_default("100", "2025-03-21T10:10:00Z"),
        RawPositionRecord::test_default("200", "21/03/2025 09:00:00"),
        missing,
    ]
}
