use crate::classifier::Classifier;
use crate::strategy::MatchStrategy;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use voxplay_core::{Catalog, MatchError, MatchResult, MatchTarget, StrategyMode};

/// Semantic fallback: asks the external classifier to pick the item whose
/// reference text best answers the transcript. Classifier output is
/// free-form; anything unparsable or out of range is a plain miss — a
/// flaky model must never abort a resolution.
pub struct ContextualStrategy {
    classifier: Arc<dyn Classifier>,
    json_re: Regex,
    number_re: Regex,
}

impl ContextualStrategy {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            json_re: Regex::new(r"\{[^}]+\}").unwrap(),
            number_re: Regex::new(r"\b(\d+)\b").unwrap(),
        }
    }

    /// Extract a verdict from raw classifier output: first an embedded JSON
    /// object with `index`/`confidence`/`reason`, then a bare leading
    /// number as a last resort.
    fn parse_verdict(&self, raw: &str, item_count: usize) -> Option<(usize, f64, String)> {
        if let Some(m) = self.json_re.find(raw) {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(m.as_str()) {
                let index = value.get("index").and_then(|v| v.as_i64()).unwrap_or(-1);
                let confidence = value
                    .get("confidence")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.95);
                let reason = value
                    .get("reason")
                    .and_then(|v| v.as_str())
                    .unwrap_or("classifier matched")
                    .to_string();
                if index < 0 {
                    // Explicit no-match verdict from the classifier.
                    return None;
                }
                if (index as usize) < item_count {
                    return Some((index as usize, confidence, reason));
                }
                tracing::warn!(
                    index,
                    item_count,
                    "classifier returned out-of-range index, treating as no match"
                );
                return None;
            }
        }

        if let Some(cap) = self.number_re.captures(raw) {
            if let Ok(index) = cap[1].parse::<usize>() {
                if index < item_count {
                    return Some((index, 0.85, "extracted from classifier output".to_string()));
                }
            }
        }

        tracing::warn!("classifier response malformed, treating as no match");
        None
    }
}

#[async_trait]
impl MatchStrategy for ContextualStrategy {
    fn name(&self) -> &str {
        "contextual"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn mode(&self) -> StrategyMode {
        StrategyMode::Async
    }

    async fn evaluate(
        &self,
        transcript: &str,
        catalog: &Catalog,
    ) -> Result<Option<MatchResult>, MatchError> {
        let raw = self.classifier.classify(transcript, catalog.items()).await?;
        tracing::debug!(classifier = %self.classifier.name(), "classifier output: {raw}");
        Ok(self
            .parse_verdict(&raw, catalog.len())
            .map(|(index, confidence, reason)| MatchResult {
                target: MatchTarget::Item(index),
                confidence,
                reason,
                strategy: "contextual".to_string(),
            }))
    }
}
