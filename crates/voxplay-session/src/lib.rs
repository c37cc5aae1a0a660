pub mod host;
pub mod null_recognizer;
pub mod queue;
pub mod recognizer;
pub mod registry;
pub mod router;
mod session;

pub use host::SessionHost;
pub use null_recognizer::NullRecognizer;
pub use queue::{FrameQueue, PushOutcome};
pub use recognizer::{Recognizer, RecognizerRegistry, RecognizerStream};
pub use registry::{SessionHandle, SessionRegistry};
pub use router::AudioFrameRouter;
