use crate::recognizer::{Recognizer, RecognizerRegistry};
use crate::registry::SessionRegistry;
use crate::router::AudioFrameRouter;
use crate::session;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use voxplay_core::{
    HotWord, RecognizerConfig, RecognizerError, SessionError, SessionEvent, SessionId,
    SessionStatus, StreamConfig,
};

/// Owns the session registry and the recognizer, spawns one worker per
/// started session, and fans all session events into one channel.
pub struct SessionHost {
    registry: Arc<SessionRegistry>,
    recognizer: Arc<dyn Recognizer>,
    config: RecognizerConfig,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    tasks: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl SessionHost {
    pub fn new(config: RecognizerConfig, recognizer: Arc<dyn Recognizer>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            registry: Arc::new(SessionRegistry::new(config.queue_capacity)),
            recognizer,
            config,
            event_tx,
            event_rx: Some(event_rx),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Build a host resolving the provider name through the registry.
    pub fn from_registry(
        config: RecognizerConfig,
        providers: &RecognizerRegistry,
    ) -> Result<Self, RecognizerError> {
        let recognizer = providers.create(&config.provider)?;
        Ok(Self::new(config, recognizer))
    }

    pub fn take_event_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.event_rx.take()
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn router(&self) -> AudioFrameRouter {
        AudioFrameRouter::new(Arc::clone(&self.registry))
    }

    /// Allocate a new session carrying the given hot-word snapshot.
    pub fn create_session(&self, hot_words: Vec<HotWord>) -> SessionId {
        self.registry.create(hot_words).id().clone()
    }

    /// Start streaming recognition for a created session. A second start
    /// while the first worker lives is a conflict with no side effects.
    pub fn start_session(&self, id: &SessionId) -> Result<(), SessionError> {
        let handle = self
            .registry
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        if !handle.claim_worker() {
            return Err(SessionError::Conflict(id.clone()));
        }

        let stream_config = StreamConfig {
            sample_rate: self.config.sample_rate,
            format: self.config.format.clone(),
            hot_words: handle.hot_words().to_vec(),
        };
        tracing::info!(
            session_id = %id,
            provider = %self.recognizer.name(),
            hot_words = handle.hot_words().len(),
            "starting recognition session"
        );

        let task = session::spawn_worker(
            Arc::clone(&self.registry),
            handle,
            Arc::clone(&self.recognizer),
            stream_config,
            self.event_tx.clone(),
            Duration::from_millis(self.config.stop_grace_ms),
        );
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }

    /// Stop a session: no further audio is accepted and the worker winds
    /// down through Completing. Idempotent; a session that was never
    /// started is torn down here with its single closed event.
    pub fn stop_session(&self, id: &SessionId) {
        let Some(handle) = self.registry.get(id) else {
            return;
        };
        handle.queue().close();
        if handle.claim_worker() {
            // Won the worker slot: no worker will ever run for this session.
            handle.set_status(SessionStatus::Closed);
            self.registry.remove(id);
            tracing::debug!(session_id = %id, "session stopped before start");
            let _ = self.event_tx.send(SessionEvent::Closed {
                session_id: id.clone(),
                no_speech: true,
            });
        }
    }

    /// Await all session workers spawned so far.
    pub async fn shutdown(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap());
        for task in tasks {
            let _ = task.await;
        }
    }
}
