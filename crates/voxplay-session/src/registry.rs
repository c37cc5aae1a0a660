use crate::queue::FrameQueue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use voxplay_core::{HotWord, SessionId, SessionStatus};

/// Per-session state owned by the registry. Counters are atomics and the
/// status sits behind its own mutex, so touching one session never contends
/// with siblings; the registry map lock covers only create/get/remove.
pub struct SessionHandle {
    id: SessionId,
    hot_words: Vec<HotWord>,
    status: Mutex<SessionStatus>,
    frame_count: AtomicU64,
    byte_count: AtomicU64,
    started: AtomicBool,
    queue: FrameQueue,
}

impl SessionHandle {
    fn new(id: SessionId, hot_words: Vec<HotWord>, queue_capacity: usize) -> Self {
        Self {
            id,
            hot_words,
            status: Mutex::new(SessionStatus::Created),
            frame_count: AtomicU64::new(0),
            byte_count: AtomicU64::new(0),
            started: AtomicBool::new(false),
            queue: FrameQueue::new(queue_capacity),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn hot_words(&self) -> &[HotWord] {
        &self.hot_words
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.lock().unwrap()
    }

    pub(crate) fn set_status(&self, status: SessionStatus) {
        let mut current = self.status.lock().unwrap();
        if current.is_terminal() {
            return;
        }
        *current = status;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    pub fn byte_count(&self) -> u64 {
        self.byte_count.load(Ordering::Relaxed)
    }

    /// Count one accepted frame; returns the updated frame count.
    pub(crate) fn record_frame(&self, bytes: u64) -> u64 {
        self.byte_count.fetch_add(bytes, Ordering::Relaxed);
        self.frame_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Claim the single worker slot for this session. Returns `true` for
    /// exactly one caller over the session's lifetime; a second `start`
    /// (or a stop racing a start) loses the claim.
    pub(crate) fn claim_worker(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn queue(&self) -> &FrameQueue {
        &self.queue
    }
}

/// Thread-safe store mapping session ids to live session state.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, Arc<SessionHandle>>>,
    next_id: AtomicU64,
    queue_capacity: usize,
}

impl SessionRegistry {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            queue_capacity,
        }
    }

    /// Allocate a new session in state `Created` with the given hot-word
    /// snapshot.
    pub fn create(&self, hot_words: Vec<HotWord>) -> Arc<SessionHandle> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = SessionId::new(format!("s{n:04}"));
        let handle = Arc::new(SessionHandle::new(id.clone(), hot_words, self.queue_capacity));
        self.sessions
            .lock()
            .unwrap()
            .insert(id.clone(), Arc::clone(&handle));
        tracing::debug!(session_id = %id, "session created");
        handle
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<SessionHandle>> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    /// Remove a session if present. Idempotent.
    pub fn remove(&self, id: &SessionId) {
        if self.sessions.lock().unwrap().remove(id).is_some() {
            tracing::debug!(session_id = %id, "session removed");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
