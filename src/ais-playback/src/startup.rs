use std::{sync::Arc, time::Duration};

use async_channel::{Receiver, Sender};
use playback_core::{ActiveSetClassifier, normalize_batch, parse_timestamp};
use snafu::ResultExt;
use tokio::sync::broadcast;
use tracing::{debug, error, instrument};

use crate::{
    error::{
        Result,
        error::{DurationRangeSnafu, InstantSnafu},
    },
    playback::{Playback, PlaybackEvent, Snapshot},
    settings::{Environment, Settings},
    source::{ManifestSource, PositionSource},
};

pub struct App {
    source: Arc<dyn PositionSource>,
    playback: Playback,
    environment: Environment,
    refresh_interval: Duration,
    sender: Sender<PlaybackEvent>,
    receiver: Receiver<PlaybackEvent>,
    snapshots: broadcast::Sender<Snapshot>,
}

impl App {
    pub async fn build(settings: &Settings) -> Result<App> {
        Self::with_source(settings, ManifestSource::new(&settings.source.manifest))
    }

    pub fn with_source(settings: &Settings, source: impl PositionSource + 'static) -> Result<App> {
        let instant = settings
            .playback
            .query_instant
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .context(InstantSnafu)?;
        let window = settings
            .playback
            .window
            .map(chrono::Duration::from_std)
            .transpose()
            .context(DurationRangeSnafu)?;
        let tolerance = chrono::Duration::from_std(settings.playback.active_tolerance)
            .context(DurationRangeSnafu)?;

        let (sender, receiver) = async_channel::bounded(settings.event_buffer_size);
        let (snapshots, _) = broadcast::channel(settings.broadcast_buffer_size);

        Ok(App {
            source: Arc::new(source),
            playback: Playback::new(
                instant,
                window,
                ActiveSetClassifier::new(tolerance),
                settings.subareas(),
            ),
            environment: settings.environment,
            refresh_interval: settings.playback.refresh_interval,
            sender,
            receiver,
            snapshots,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    pub fn events(&self) -> Sender<PlaybackEvent> {
        self.sender.clone()
    }

    pub async fn run(self) -> Result<()> {
        match self.environment {
            Environment::Local | Environment::Development | Environment::Production => {
                self.run_continuous().await
            }
            Environment::Test => self.run_single().await.map(|_| ()),
        }
    }

    /// Reloads the source every refresh interval and applies events as they arrive, publishing a
    /// snapshot after each change. Never returns.
    pub async fn run_continuous(mut self) -> Result<()> {
        let mut interval = tokio::time::interval(self.refresh_interval);
        let receiver = self.receiver.clone();

        loop {
            tokio::select! {
                _ = interval.tick() => self.refresh().await,
                // `self.sender` keeps the channel open, `recv` only returns events.
                Ok(event) = receiver.recv() => {
                    self.playback.apply(event);
                    self.publish();
                }
            }
        }
    }

    /// Loads the source once, applies every pending event and publishes the resulting snapshot.
    #[instrument(skip_all)]
    pub async fn run_single(mut self) -> Result<Snapshot> {
        self.load().await?;
        while let Ok(event) = self.receiver.try_recv() {
            self.playback.apply(event);
        }
        Ok(self.publish())
    }

    #[instrument(skip_all)]
    async fn refresh(&mut self) {
        match self.load().await {
            Ok(()) => {
                self.publish();
            }
            Err(e) => error!("failed to refresh ais data: {e:?}"),
        }
    }

    async fn load(&mut self) -> Result<()> {
        let records = self.source.records().await?;
        self.playback.replace_index(normalize_batch(records));
        Ok(())
    }

    fn publish(&mut self) -> Snapshot {
        let snapshot = self.playback.snapshot();
        if self.snapshots.send(snapshot.clone()).is_err() {
            debug!("no snapshot subscribers");
        }
        snapshot
    }
}
