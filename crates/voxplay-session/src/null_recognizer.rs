use crate::recognizer::{Recognizer, RecognizerStream};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;
use voxplay_core::{HotWord, RecognizerError, RecognizerEvent, StreamConfig};

/// Interval at which the default stream reports a synthetic partial.
const PARTIAL_EVERY_FRAMES: u64 = 25;

#[derive(Debug, Clone)]
struct Script {
    partials: Vec<String>,
    final_text: String,
}

/// In-process recognizer: counts audio bytes and synthesizes transcripts.
///
/// The default stream emits a byte-count partial every few frames and a
/// byte-count final on close; zero audio bytes close with no transcript at
/// all, which drives the no-speech path. Builders inject scripted
/// transcripts and failures for tests.
pub struct NullRecognizer {
    script: Option<Script>,
    open_error: Option<RecognizerError>,
    frame_error: Option<RecognizerError>,
    hold_completion: bool,
    last_hot_words: Mutex<Vec<HotWord>>,
}

impl NullRecognizer {
    pub fn new() -> Self {
        Self {
            script: None,
            open_error: None,
            frame_error: None,
            hold_completion: false,
            last_hot_words: Mutex::new(Vec::new()),
        }
    }

    /// Emit the given partials (one per frame, in order) and this final text.
    pub fn with_script(partials: Vec<String>, final_text: impl Into<String>) -> Self {
        let mut recognizer = Self::new();
        recognizer.script = Some(Script {
            partials,
            final_text: final_text.into(),
        });
        recognizer
    }

    /// Fail `open_stream` with the given error.
    pub fn with_open_error(error: RecognizerError) -> Self {
        let mut recognizer = Self::new();
        recognizer.open_error = Some(error);
        recognizer
    }

    /// Push the given error event after the first audio frame.
    pub fn with_frame_error(error: RecognizerError) -> Self {
        let mut recognizer = Self::new();
        recognizer.frame_error = Some(error);
        recognizer
    }

    /// Never acknowledge completion, so stop() runs into its grace period.
    pub fn with_held_completion(mut self) -> Self {
        self.hold_completion = true;
        self
    }

    /// Hot words received by the most recent `open_stream` call.
    pub fn last_hot_words(&self) -> Vec<HotWord> {
        self.last_hot_words.lock().unwrap().clone()
    }
}

impl Default for NullRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recognizer for NullRecognizer {
    fn name(&self) -> &str {
        "null"
    }

    async fn open_stream(
        &self,
        config: StreamConfig,
        events: mpsc::UnboundedSender<RecognizerEvent>,
    ) -> Result<Box<dyn RecognizerStream>, RecognizerError> {
        if let Some(err) = &self.open_error {
            return Err(err.clone());
        }
        *self.last_hot_words.lock().unwrap() = config.hot_words;
        Ok(Box::new(NullStream {
            events,
            frames: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            script: self.script.clone(),
            frame_error: self.frame_error.clone(),
            hold_completion: self.hold_completion,
        }))
    }
}

struct NullStream {
    events: mpsc::UnboundedSender<RecognizerEvent>,
    frames: AtomicU64,
    bytes: AtomicU64,
    closed: AtomicBool,
    script: Option<Script>,
    frame_error: Option<RecognizerError>,
    hold_completion: bool,
}

#[async_trait]
impl RecognizerStream for NullStream {
    async fn send_frame(&self, frame: &[u8]) -> Result<(), RecognizerError> {
        let frames = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        let bytes = self.bytes.fetch_add(frame.len() as u64, Ordering::Relaxed)
            + frame.len() as u64;

        if frames == 1 {
            if let Some(err) = &self.frame_error {
                let _ = self.events.send(RecognizerEvent::Error(err.clone()));
                return Ok(());
            }
        }

        match &self.script {
            Some(script) => {
                if let Some(partial) = script.partials.get(frames as usize - 1) {
                    let _ = self.events.send(RecognizerEvent::Transcript {
                        text: partial.clone(),
                        is_final: false,
                    });
                }
            }
            None => {
                if frames % PARTIAL_EVERY_FRAMES == 0 {
                    let _ = self.events.send(RecognizerEvent::Transcript {
                        text: format!("[null] {bytes} bytes"),
                        is_final: false,
                    });
                }
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), RecognizerError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if self.hold_completion {
            return Ok(());
        }

        let final_text = match &self.script {
            Some(script) => Some(script.final_text.clone()),
            None => {
                let bytes = self.bytes.load(Ordering::Relaxed);
                (bytes > 0).then(|| format!("[null] {bytes} bytes"))
            }
        };
        if let Some(text) = final_text {
            let _ = self.events.send(RecognizerEvent::Transcript {
                text,
                is_final: true,
            });
        }
        let _ = self.events.send(RecognizerEvent::Completed);
        Ok(())
    }
}
