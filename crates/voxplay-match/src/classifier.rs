use async_trait::async_trait;
use voxplay_core::{CatalogItem, MatchError};

/// External semantic classifier: given the transcript and the catalog's
/// reference texts, returns the provider's raw textual output. The
/// contextual strategy owns parsing; providers stay a thin transport.
#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(
        &self,
        transcript: &str,
        items: &[CatalogItem],
    ) -> Result<String, MatchError>;
}

/// In-process classifier returning a fixed response. The default response
/// is the explicit no-match verdict.
pub struct NullClassifier {
    response: String,
}

impl NullClassifier {
    pub fn new() -> Self {
        Self::with_response(r#"{"index": -1, "confidence": 0, "reason": "no suitable response"}"#)
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Default for NullClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for NullClassifier {
    fn name(&self) -> &str {
        "null"
    }

    async fn classify(
        &self,
        _transcript: &str,
        _items: &[CatalogItem],
    ) -> Result<String, MatchError> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_classifier_default_is_no_match_verdict() {
        let classifier = NullClassifier::new();
        let raw = classifier.classify("你好", &[]).await.unwrap();
        assert!(raw.contains("-1"));
    }

    #[tokio::test]
    async fn test_null_classifier_fixed_response() {
        let classifier = NullClassifier::with_response(r#"{"index": 2, "confidence": 0.8}"#);
        let raw = classifier.classify("你好", &[]).await.unwrap();
        assert!(raw.contains("\"index\": 2"));
    }
}
