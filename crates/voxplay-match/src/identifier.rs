use crate::strategy::MatchStrategy;
use crate::text::normalize;
use async_trait::async_trait;
use voxplay_core::{Catalog, MatchError, MatchResult, MatchTarget, StrategyMode};

/// Matches the transcript against catalog display names, case-insensitively
/// and ignoring punctuation. First catalog item to match wins.
pub struct IdentifierStrategy;

#[async_trait]
impl MatchStrategy for IdentifierStrategy {
    fn name(&self) -> &str {
        "identifier"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn mode(&self) -> StrategyMode {
        StrategyMode::Sync
    }

    async fn evaluate(
        &self,
        transcript: &str,
        catalog: &Catalog,
    ) -> Result<Option<MatchResult>, MatchError> {
        let transcript = normalize(transcript);
        if transcript.is_empty() {
            return Ok(None);
        }

        for (index, item) in catalog.items().iter().enumerate() {
            let name = normalize(&item.display_name);
            if name.is_empty() {
                continue;
            }
            let confidence = if name == transcript {
                1.0
            } else if transcript.contains(&name) || name.contains(&transcript) {
                0.9
            } else {
                continue;
            };
            return Ok(Some(MatchResult {
                target: MatchTarget::Item(index),
                confidence,
                reason: format!("display name '{}'", item.display_name),
                strategy: "identifier".to_string(),
            }));
        }
        Ok(None)
    }
}
