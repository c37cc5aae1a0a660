use serde::{Deserialize, Serialize};

/// Opaque identifier for one recognition session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a streaming recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Created,
    Open,
    Streaming,
    Completing,
    Closed,
    Errored,
}

impl SessionStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Closed | SessionStatus::Errored)
    }

    /// Whether the session still accepts inbound audio.
    pub fn accepts_audio(self) -> bool {
        matches!(
            self,
            SessionStatus::Created | SessionStatus::Open | SessionStatus::Streaming
        )
    }
}

/// Weighted vocabulary hint passed through to the recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotWord {
    pub word: String,
    pub weight: i32,
}

/// Parameters for opening a recognizer stream. Hot words are opaque to the
/// core; the provider decides what to do with the weights.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub sample_rate: u32,
    pub format: String,
    pub hot_words: Vec<HotWord>,
}

/// Push notification from a recognizer stream.
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    Transcript { text: String, is_final: bool },
    Completed,
    Error(crate::error::RecognizerError),
}

/// Event surfaced to the session host's consumer. Exactly one terminal
/// event (`Error` or `Closed`) is emitted per session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Opened {
        session_id: SessionId,
    },
    PartialTranscript {
        session_id: SessionId,
        text: String,
    },
    FinalTranscript {
        session_id: SessionId,
        text: String,
    },
    Error {
        session_id: SessionId,
        error: crate::error::RecognizerError,
    },
    Closed {
        session_id: SessionId,
        no_speech: bool,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionEvent::Opened { session_id }
            | SessionEvent::PartialTranscript { session_id, .. }
            | SessionEvent::FinalTranscript { session_id, .. }
            | SessionEvent::Error { session_id, .. }
            | SessionEvent::Closed { session_id, .. } => session_id,
        }
    }
}

/// Playback control commands a transcript can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    Advance,
    Retreat,
    Pause,
    Resume,
    Restart,
}

/// What a match strategy resolved the transcript to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget {
    /// Index into the catalog snapshot the resolution ran against.
    Item(usize),
    Control(ControlAction),
}

/// Whether a strategy runs inline (bounded, cheap) or as a spawned task
/// (unbounded network/model latency).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyMode {
    Sync,
    Async,
}

/// Outcome of one strategy evaluation. Immutable once constructed;
/// `confidence` and `reason` are diagnostics, never decision inputs.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub target: MatchTarget,
    pub confidence: f64,
    pub reason: String,
    pub strategy: String,
}

/// One playable unit with optional reference text for content matching.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    pub id: String,
    pub display_name: String,
    pub transcript_text: Option<String>,
}

/// Immutable, ordered catalog snapshot. Resolutions and dispatches operate
/// on one snapshot; reloads build a new one.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
