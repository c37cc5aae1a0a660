use crate::strategy::MatchStrategy;
use crate::text::normalize;
use async_trait::async_trait;
use voxplay_core::{
    Catalog, ControlAction, KeywordsConfig, MatchError, MatchResult, MatchTarget, StrategyMode,
};

/// Operational-keyword strategy: maps a fixed vocabulary straight to
/// control actions. Highest priority, so "暂停" pauses even when a catalog
/// item's reference text contains the same word.
pub struct KeywordStrategy {
    vocabulary: Vec<(ControlAction, Vec<String>)>,
}

impl KeywordStrategy {
    pub fn new(config: &KeywordsConfig) -> Self {
        let vocabulary = config
            .entries()
            .into_iter()
            .map(|(action, words)| {
                (
                    action,
                    words.iter().map(|w| normalize(w)).collect::<Vec<_>>(),
                )
            })
            .collect();
        Self { vocabulary }
    }

    fn result(action: ControlAction, word: &str, confidence: f64) -> MatchResult {
        MatchResult {
            target: MatchTarget::Control(action),
            confidence,
            reason: format!("matched keyword '{word}'"),
            strategy: "keyword".to_string(),
        }
    }
}

#[async_trait]
impl MatchStrategy for KeywordStrategy {
    fn name(&self) -> &str {
        "keyword"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn mode(&self) -> StrategyMode {
        StrategyMode::Sync
    }

    async fn evaluate(
        &self,
        transcript: &str,
        _catalog: &Catalog,
    ) -> Result<Option<MatchResult>, MatchError> {
        let transcript = normalize(transcript);
        if transcript.is_empty() {
            return Ok(None);
        }

        // Exact hits first so a short command is never shadowed by a longer
        // keyword elsewhere in the vocabulary.
        for (action, words) in &self.vocabulary {
            if words.iter().any(|w| *w == transcript) {
                return Ok(Some(Self::result(*action, &transcript, 1.0)));
            }
        }
        for (action, words) in &self.vocabulary {
            if let Some(word) = words.iter().find(|w| transcript.contains(w.as_str())) {
                return Ok(Some(Self::result(*action, word, 1.0)));
            }
        }
        Ok(None)
    }
}
