use crate::recognizer::Recognizer;
use crate::registry::{SessionHandle, SessionRegistry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use voxplay_core::{
    RecognizerError, RecognizerEvent, SessionEvent, SessionStatus, StreamConfig,
};

/// Running transcript state for one session worker.
struct TranscriptState {
    last_text: String,
    final_sent: bool,
    saw_speech: bool,
}

impl TranscriptState {
    fn new() -> Self {
        Self {
            last_text: String::new(),
            final_sent: false,
            saw_speech: false,
        }
    }

    /// Apply one transcript event; emits partial/final to the caller.
    /// The final transcript is emitted at most once per session.
    fn on_transcript(
        &mut self,
        handle: &SessionHandle,
        events: &mpsc::UnboundedSender<SessionEvent>,
        text: String,
        is_final: bool,
    ) {
        if !text.is_empty() {
            self.saw_speech = true;
        }
        if is_final {
            if !self.final_sent {
                self.final_sent = true;
                self.last_text = text.clone();
                tracing::info!(session_id = %handle.id(), "final transcript: {text}");
                let _ = events.send(SessionEvent::FinalTranscript {
                    session_id: handle.id().clone(),
                    text,
                });
            }
        } else {
            tracing::debug!(session_id = %handle.id(), "partial transcript: {text}");
            self.last_text = text.clone();
            let _ = events.send(SessionEvent::PartialTranscript {
                session_id: handle.id().clone(),
                text,
            });
        }
    }
}

fn emit_error(
    registry: &SessionRegistry,
    handle: &SessionHandle,
    events: &mpsc::UnboundedSender<SessionEvent>,
    error: RecognizerError,
) {
    tracing::error!(session_id = %handle.id(), "session error: {error}");
    handle.set_status(SessionStatus::Errored);
    let _ = events.send(SessionEvent::Error {
        session_id: handle.id().clone(),
        error,
    });
    registry.remove(handle.id());
}

fn emit_closed(
    registry: &SessionRegistry,
    handle: &SessionHandle,
    events: &mpsc::UnboundedSender<SessionEvent>,
    transcript: &mut TranscriptState,
) {
    // The final transcript (possibly carried over from the last partial,
    // possibly empty) always precedes the closed event.
    if !transcript.final_sent {
        transcript.final_sent = true;
        let text = transcript.last_text.clone();
        tracing::info!(session_id = %handle.id(), "final transcript (from last partial): {text}");
        let _ = events.send(SessionEvent::FinalTranscript {
            session_id: handle.id().clone(),
            text,
        });
    }
    handle.set_status(SessionStatus::Closed);
    tracing::info!(
        session_id = %handle.id(),
        frames = handle.frame_count(),
        bytes = handle.byte_count(),
        "session closed"
    );
    let _ = events.send(SessionEvent::Closed {
        session_id: handle.id().clone(),
        no_speech: !transcript.saw_speech,
    });
    registry.remove(handle.id());
}

/// Spawn the worker driving one session's state machine: it opens the
/// recognizer stream, forwards queued audio in order, adapts recognizer
/// pushes into session events, and guarantees exactly one terminal event.
pub(crate) fn spawn_worker(
    registry: Arc<SessionRegistry>,
    handle: Arc<SessionHandle>,
    recognizer: Arc<dyn Recognizer>,
    stream_config: StreamConfig,
    events: mpsc::UnboundedSender<SessionEvent>,
    stop_grace: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let (rec_tx, mut rec_rx) = mpsc::unbounded_channel();
        let stream = match recognizer.open_stream(stream_config, rec_tx).await {
            Ok(stream) => stream,
            Err(error) => {
                emit_error(&registry, &handle, &events, error);
                return;
            }
        };
        handle.set_status(SessionStatus::Open);
        tracing::info!(session_id = %handle.id(), "recognition stream opened");
        let _ = events.send(SessionEvent::Opened {
            session_id: handle.id().clone(),
        });

        let mut transcript = TranscriptState::new();

        // Streaming phase: race queued audio against recognizer pushes.
        loop {
            tokio::select! {
                frame = handle.queue().pop() => match frame {
                    Some(bytes) => {
                        if handle.status() == SessionStatus::Open {
                            handle.set_status(SessionStatus::Streaming);
                        }
                        if let Err(error) = stream.send_frame(&bytes).await {
                            let _ = stream.close().await;
                            emit_error(&registry, &handle, &events, error);
                            return;
                        }
                    }
                    None => {
                        // Queue closed by stop() and fully drained.
                        handle.set_status(SessionStatus::Completing);
                        tracing::debug!(session_id = %handle.id(), "audio ingestion stopped, completing");
                        if let Err(error) = stream.close().await {
                            tracing::warn!(session_id = %handle.id(), "recognizer close failed: {error}");
                        }
                        break;
                    }
                },
                event = rec_rx.recv() => match event {
                    Some(RecognizerEvent::Transcript { text, is_final }) => {
                        transcript.on_transcript(&handle, &events, text, is_final);
                    }
                    Some(RecognizerEvent::Completed) => {
                        handle.set_status(SessionStatus::Completing);
                        handle.queue().close();
                        emit_closed(&registry, &handle, &events, &mut transcript);
                        return;
                    }
                    Some(RecognizerEvent::Error(error)) => {
                        handle.queue().close();
                        let _ = stream.close().await;
                        emit_error(&registry, &handle, &events, error);
                        return;
                    }
                    None => {
                        handle.queue().close();
                        emit_error(
                            &registry,
                            &handle,
                            &events,
                            RecognizerError::ConnectionFailed(
                                "recognizer event channel closed".to_string(),
                            ),
                        );
                        return;
                    }
                }
            }
        }

        // Completing phase: wait out remaining recognizer events under a
        // bounded grace period, then force-close.
        let deadline = tokio::time::Instant::now() + stop_grace;
        loop {
            match tokio::time::timeout_at(deadline, rec_rx.recv()).await {
                Ok(Some(RecognizerEvent::Transcript { text, is_final })) => {
                    transcript.on_transcript(&handle, &events, text, is_final);
                }
                Ok(Some(RecognizerEvent::Completed)) | Ok(None) => {
                    emit_closed(&registry, &handle, &events, &mut transcript);
                    return;
                }
                Ok(Some(RecognizerEvent::Error(error))) => {
                    emit_error(&registry, &handle, &events, error);
                    return;
                }
                Err(_) => {
                    emit_error(
                        &registry,
                        &handle,
                        &events,
                        RecognizerError::CompletionTimeout(stop_grace.as_millis() as u64),
                    );
                    return;
                }
            }
        }
    })
}
