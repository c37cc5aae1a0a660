use anyhow::{Context, Result};
use clap::Parser;
use notify::Watcher;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use voxplay_core::{AppConfig, SessionEvent};
use voxplay_match::{MatchEngine, NullClassifier};
use voxplay_player::{CatalogStore, Dispatcher, PlaybackUpdate, Provenance};
use voxplay_session::{RecognizerRegistry, SessionHost};

// 100ms of 16kHz mono s16le audio per routed frame.
const FRAME_BYTES: usize = 3200;

#[derive(Parser)]
#[command(name = "voxplay", about = "Voice-controlled sequential media playback")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Stream a raw PCM file through one recognition session and apply
    /// the resulting transcripts
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Resolve a single transcript and exit
    #[arg(long)]
    say: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    let env_filter =
        EnvFilter::try_new(&config.general.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("voxplay starting");

    let store = Arc::new(
        CatalogStore::new(config.media.clone())
            .with_context(|| format!("failed to load media catalog from '{}'", config.media.dir))?,
    );
    if store.snapshot().is_empty() {
        tracing::warn!(dir = %config.media.dir, "media catalog is empty");
    }

    // Reload the catalog when the media directory changes.
    let watch_store = Arc::clone(&store);
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(_) => {
                if let Err(e) = watch_store.reload() {
                    tracing::warn!("catalog reload failed: {e}");
                }
            }
            Err(e) => tracing::warn!("media watch error: {e}"),
        }
    })
    .context("failed to create media directory watcher")?;
    watcher
        .watch(
            std::path::Path::new(&config.media.dir),
            notify::RecursiveMode::NonRecursive,
        )
        .with_context(|| format!("failed to watch media directory '{}'", config.media.dir))?;

    let engine = MatchEngine::with_defaults(&config.matching, Arc::new(NullClassifier::new()));
    let mut dispatcher = Dispatcher::new(config.matching.default_action);

    if let Some(text) = cli.say {
        handle_transcript(&text, &engine, &store, &mut dispatcher).await;
        return Ok(());
    }

    let providers = RecognizerRegistry::new();
    let mut host = SessionHost::from_registry(config.recognizer.clone(), &providers)
        .with_context(|| format!("unknown recognizer provider '{}'", config.recognizer.provider))?;
    let mut events = host
        .take_event_receiver()
        .context("session event receiver already taken")?;

    if let Some(audio_path) = cli.audio {
        stream_audio_file(&audio_path, &host, &config).await?;
        while let Some(event) = events.recv().await {
            if !handle_session_event(event, &engine, &store, &mut dispatcher).await {
                break;
            }
        }
        host.shutdown().await;
        return Ok(());
    }

    // Interactive mode: each stdin line is treated as one final transcript.
    tracing::info!("reading transcripts from stdin, one per line");
    let (line_tx, mut line_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            line = line_rx.recv() => {
                let Some(line) = line else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                handle_transcript(line, &engine, &store, &mut dispatcher).await;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                handle_session_event(event, &engine, &store, &mut dispatcher).await;
            }
        }
    }

    tracing::info!("shutting down");
    host.shutdown().await;
    Ok(())
}

/// Create one session, stream the file through the frame router, stop.
async fn stream_audio_file(path: &PathBuf, host: &SessionHost, config: &AppConfig) -> Result<()> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read audio file {path:?}"))?;

    let session_id = host.create_session(config.hot_words.active_words());
    host.start_session(&session_id)
        .with_context(|| format!("failed to start session {session_id}"))?;
    tracing::info!(session_id = %session_id, bytes = data.len(), "streaming audio file");

    let router = host.router();
    for frame in data.chunks(FRAME_BYTES) {
        router
            .route(&session_id, frame.to_vec())
            .with_context(|| format!("failed to route frame to session {session_id}"))?;
    }
    host.stop_session(&session_id);
    Ok(())
}

/// Returns false once the session reached a terminal event.
async fn handle_session_event(
    event: SessionEvent,
    engine: &MatchEngine,
    store: &CatalogStore,
    dispatcher: &mut Dispatcher,
) -> bool {
    match event {
        SessionEvent::Opened { session_id } => {
            tracing::info!(session_id = %session_id, "session opened");
        }
        SessionEvent::PartialTranscript { session_id, text } => {
            tracing::debug!(session_id = %session_id, "partial: {text}");
        }
        SessionEvent::FinalTranscript { session_id, text } => {
            tracing::info!(session_id = %session_id, "final transcript: {text}");
            handle_transcript(&text, engine, store, dispatcher).await;
        }
        SessionEvent::Error { session_id, error } => {
            tracing::error!(session_id = %session_id, "session failed: {error}");
            return false;
        }
        SessionEvent::Closed {
            session_id,
            no_speech,
        } => {
            tracing::info!(session_id = %session_id, no_speech, "session closed");
            return false;
        }
    }
    true
}

async fn handle_transcript(
    text: &str,
    engine: &MatchEngine,
    store: &CatalogStore,
    dispatcher: &mut Dispatcher,
) {
    let catalog = store.snapshot();
    let outcome = engine.resolve(text, Arc::clone(&catalog)).await;
    match dispatcher.apply(outcome, &catalog) {
        Some(update) => log_update(&update),
        None => tracing::info!("transcript produced no playback change: {text}"),
    }
}

fn log_update(update: &PlaybackUpdate) {
    match &update.provenance {
        Provenance::Strategy { name, confidence } => tracing::info!(
            strategy = %name,
            confidence,
            index = update.index,
            item = %update.item_id,
            paused = update.paused,
            "playback {:?}",
            update.action,
        ),
        Provenance::Fallback => tracing::info!(
            index = update.index,
            item = %update.item_id,
            paused = update.paused,
            "playback {:?} (no match, default action)",
            update.action,
        ),
    }
}
