use crate::strategy::MatchStrategy;
use crate::text::tokens;
use async_trait::async_trait;
use voxplay_core::{Catalog, MatchError, MatchResult, MatchTarget, StrategyMode};

/// Fuzzy token overlap between the transcript and each item's reference
/// text. Tokens found in the text's leading segment count full weight,
/// later occurrences half; the best item above the threshold wins.
pub struct ReferenceTextStrategy {
    min_overlap: f64,
    lead_chars: usize,
}

impl ReferenceTextStrategy {
    pub fn new(min_overlap: f64, lead_chars: usize) -> Self {
        Self {
            min_overlap,
            lead_chars,
        }
    }

    fn score(&self, transcript_tokens: &[String], reference: &str) -> f64 {
        let full: String = reference.to_lowercase();
        let lead: String = full.chars().take(self.lead_chars).collect();
        let mut score = 0.0;
        for token in transcript_tokens {
            if lead.contains(token.as_str()) {
                score += 1.0;
            } else if full.contains(token.as_str()) {
                score += 0.5;
            }
        }
        score / transcript_tokens.len() as f64
    }
}

#[async_trait]
impl MatchStrategy for ReferenceTextStrategy {
    fn name(&self) -> &str {
        "reference"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn mode(&self) -> StrategyMode {
        StrategyMode::Sync
    }

    async fn evaluate(
        &self,
        transcript: &str,
        catalog: &Catalog,
    ) -> Result<Option<MatchResult>, MatchError> {
        let transcript_tokens = tokens(transcript);
        if transcript_tokens.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, item) in catalog.items().iter().enumerate() {
            let Some(reference) = &item.transcript_text else {
                continue;
            };
            let overlap = self.score(&transcript_tokens, reference);
            if overlap >= self.min_overlap && best.map_or(true, |(_, b)| overlap > b) {
                best = Some((index, overlap));
            }
        }

        Ok(best.map(|(index, overlap)| MatchResult {
            target: MatchTarget::Item(index),
            confidence: overlap.min(1.0),
            reason: format!("reference-text overlap {overlap:.2}"),
            strategy: "reference".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxplay_core::CatalogItem;

    fn item(id: &str, text: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            display_name: id.to_string(),
            transcript_text: text.map(|t| t.to_string()),
        }
    }

    fn strategy() -> ReferenceTextStrategy {
        ReferenceTextStrategy::new(0.35, 80)
    }

    #[tokio::test]
    async fn test_reference_picks_highest_overlap() {
        let catalog = Catalog::new(vec![
            item("a", Some("我们的产品支持语音控制和自动播放")),
            item("b", Some("今天天气不错，适合出门散步")),
        ]);
        let result = strategy()
            .evaluate("介绍一下产品的语音控制", &catalog)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.target, MatchTarget::Item(0));
        assert_eq!(result.strategy, "reference");
        assert!(result.confidence >= 0.35);
    }

    #[tokio::test]
    async fn test_reference_below_threshold_is_no_match() {
        let catalog = Catalog::new(vec![item("a", Some("完全不同的主题内容"))]);
        let result = strategy()
            .evaluate("random english words only", &catalog)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_reference_skips_items_without_text() {
        let catalog = Catalog::new(vec![item("a", None), item("b", Some("语音控制产品"))]);
        let result = strategy()
            .evaluate("语音控制", &catalog)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.target, MatchTarget::Item(1));
    }

    #[tokio::test]
    async fn test_reference_lead_segment_weighs_double() {
        // Token hits beyond the leading segment score half, dropping the
        // item below the threshold that a lead hit would clear.
        let tail_only = format!("{}语音控制", "废".repeat(100));
        let catalog = Catalog::new(vec![item("tail", Some(&tail_only))]);
        let strategy = ReferenceTextStrategy::new(0.75, 80);
        let result = strategy.evaluate("语音控制", &catalog).await.unwrap();
        assert!(result.is_none());

        let lead = "语音控制的说明";
        let catalog = Catalog::new(vec![item("lead", Some(lead))]);
        let result = strategy.evaluate("语音控制", &catalog).await.unwrap();
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_reference_empty_transcript() {
        let catalog = Catalog::new(vec![item("a", Some("语音控制"))]);
        assert!(strategy().evaluate("", &catalog).await.unwrap().is_none());
    }
}
