use crate::queue::PushOutcome;
use crate::registry::SessionRegistry;
use std::sync::Arc;
use voxplay_core::{SessionError, SessionId, SessionStatus};

/// Frames between progress log lines.
const PROGRESS_LOG_EVERY: u64 = 50;

/// Delivers inbound binary audio frames to the owning session's queue.
#[derive(Clone)]
pub struct AudioFrameRouter {
    registry: Arc<SessionRegistry>,
}

impl AudioFrameRouter {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Enqueue one frame for the session's recognizer. Counters are bumped
    /// exactly once per accepted frame, here and nowhere else; a frame the
    /// queue later displaces under drop-oldest stays counted.
    pub fn route(&self, id: &SessionId, frame: Vec<u8>) -> Result<(), SessionError> {
        let handle = self
            .registry
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.clone()))?;

        if !handle.status().accepts_audio() {
            return Err(SessionError::NotStreaming(id.clone()));
        }

        let bytes = frame.len() as u64;
        match handle.queue().push(frame) {
            PushOutcome::Closed => return Err(SessionError::NotStreaming(id.clone())),
            PushOutcome::DroppedOldest => {
                tracing::warn!(
                    session_id = %id,
                    dropped = handle.queue().dropped(),
                    "audio queue full, dropped oldest frame (degraded audio)"
                );
            }
            PushOutcome::Accepted => {}
        }

        if handle.status() == SessionStatus::Open {
            handle.set_status(SessionStatus::Streaming);
        }

        let frames = handle.record_frame(bytes);
        if frames % PROGRESS_LOG_EVERY == 0 {
            tracing::info!(
                session_id = %id,
                frames,
                bytes = handle.byte_count(),
                "audio progress"
            );
        }
        Ok(())
    }
}
