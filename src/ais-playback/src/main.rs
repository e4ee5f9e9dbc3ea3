use ais_playback::{settings::Settings, startup::App};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let settings = Settings::new().unwrap();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(&settings.log_level))
        .with_writer(std::io::stderr)
        .init();

    let app = App::build(&settings).await.unwrap();

    let mut snapshots = app.subscribe();
    tokio::spawn(async move {
        loop {
            match snapshots.recv().await {
                Ok(snapshot) => match serde_json::to_string(&snapshot) {
                    Ok(line) => println!("{line}"),
                    Err(e) => error!("failed to serialize snapshot: {e:?}"),
                },
                Err(RecvError::Lagged(n)) => warn!("snapshot printer lagged behind by {n}"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if let Err(e) = app.run().await {
        panic!("playback exited unexpectedly: {e:?}");
    }
}
