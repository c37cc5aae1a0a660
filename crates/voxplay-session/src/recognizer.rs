use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use voxplay_core::{RecognizerError, RecognizerEvent, StreamConfig};

/// A streaming speech recognizer provider.
///
/// `open_stream` establishes one bidirectional channel: audio goes in via
/// the returned [`RecognizerStream`]; partial/final transcripts, completion,
/// and errors come back as [`RecognizerEvent`]s pushed on `events`. The
/// session worker adapts those pushes into state-machine transitions.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Provider name (e.g. `"null"`).
    fn name(&self) -> &str;

    async fn open_stream(
        &self,
        config: StreamConfig,
        events: mpsc::UnboundedSender<RecognizerEvent>,
    ) -> Result<Box<dyn RecognizerStream>, RecognizerError>;
}

/// One live recognition stream.
#[async_trait]
pub trait RecognizerStream: Send + Sync {
    /// Forward one audio frame, in arrival order.
    async fn send_frame(&self, frame: &[u8]) -> Result<(), RecognizerError>;

    /// Signal end of audio. The provider is expected to deliver any
    /// remaining transcript events followed by `Completed`.
    async fn close(&self) -> Result<(), RecognizerError>;
}

impl std::fmt::Debug for dyn RecognizerStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecognizerStream")
    }
}

pub struct RecognizerRegistry {
    factories: HashMap<String, fn() -> Arc<dyn Recognizer>>,
}

impl RecognizerRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("null", || {
            Arc::new(crate::null_recognizer::NullRecognizer::new())
        });
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Arc<dyn Recognizer>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Arc<dyn Recognizer>, RecognizerError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| RecognizerError::ProviderNotFound(name.to_string()))
    }

    pub fn list_providers(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for RecognizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new_has_null_provider() {
        let registry = RecognizerRegistry::new();
        let recognizer = registry.create("null").unwrap();
        assert_eq!(recognizer.name(), "null");
    }

    #[test]
    fn test_registry_create_unknown_returns_error() {
        let registry = RecognizerRegistry::new();
        match registry.create("nope") {
            Err(RecognizerError::ProviderNotFound(name)) => assert_eq!(name, "nope"),
            _ => panic!("expected ProviderNotFound"),
        }
    }

    #[test]
    fn test_registry_register_custom_provider() {
        let mut registry = RecognizerRegistry::new();
        registry.register("custom", || {
            Arc::new(crate::null_recognizer::NullRecognizer::new())
        });
        assert!(registry.create("custom").is_ok());
        assert!(registry.list_providers().contains(&"custom"));
    }

    #[test]
    fn test_registry_list_providers_includes_null() {
        let registry = RecognizerRegistry::new();
        assert!(registry.list_providers().contains(&"null"));
    }
}
