use crate::strategy::MatchStrategy;
use crate::text::normalize;
use async_trait::async_trait;
use regex::Regex;
use voxplay_core::{Catalog, MatchError, MatchResult, MatchTarget, StrategyMode};

/// Parses ordinal/numeric position references ("第二个", "3号", bare "5")
/// into a 1-based catalog position. Out-of-range positions are a miss, not
/// an error; wrapping is deliberately not supported.
pub struct OrdinalStrategy {
    ordinal_re: Regex,
    bare_re: Regex,
}

impl OrdinalStrategy {
    pub fn new() -> Self {
        Self {
            ordinal_re: Regex::new(r"第([0-9零一二三四五六七八九十两]+)[个條条集段]?").unwrap(),
            bare_re: Regex::new(r"^([0-9]+)号?$").unwrap(),
        }
    }

    fn parse_position(&self, text: &str) -> Option<usize> {
        if let Some(cap) = self.ordinal_re.captures(text) {
            return parse_numeral(&cap[1]);
        }
        if let Some(cap) = self.bare_re.captures(text) {
            return cap[1].parse().ok();
        }
        None
    }
}

impl Default for OrdinalStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an ASCII or Chinese numeral up to 99.
fn parse_numeral(s: &str) -> Option<usize> {
    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }

    fn digit(c: char) -> Option<usize> {
        Some(match c {
            '零' => 0,
            '一' => 1,
            '二' | '两' => 2,
            '三' => 3,
            '四' => 4,
            '五' => 5,
            '六' => 6,
            '七' => 7,
            '八' => 8,
            '九' => 9,
            _ => return None,
        })
    }

    let chars: Vec<char> = s.chars().collect();
    match *chars.as_slice() {
        [c] if c == '十' => Some(10),
        [c] => digit(c),
        ['十', ones] => Some(10 + digit(ones)?),
        [tens, '十'] => Some(digit(tens)? * 10),
        [tens, '十', ones] => Some(digit(tens)? * 10 + digit(ones)?),
        _ => None,
    }
}

#[async_trait]
impl MatchStrategy for OrdinalStrategy {
    fn name(&self) -> &str {
        "ordinal"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn mode(&self) -> StrategyMode {
        StrategyMode::Sync
    }

    async fn evaluate(
        &self,
        transcript: &str,
        catalog: &Catalog,
    ) -> Result<Option<MatchResult>, MatchError> {
        let text = normalize(transcript);
        let Some(position) = self.parse_position(&text) else {
            return Ok(None);
        };
        // 1-based position; zero or past the end is simply no match.
        if position == 0 || position > catalog.len() {
            return Ok(None);
        }
        Ok(Some(MatchResult {
            target: MatchTarget::Item(position - 1),
            confidence: 1.0,
            reason: format!("position {position}"),
            strategy: "ordinal".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxplay_core::CatalogItem;

    fn catalog(n: usize) -> Catalog {
        Catalog::new(
            (0..n)
                .map(|i| CatalogItem {
                    id: format!("clip{i}.mp4"),
                    display_name: format!("clip{i}"),
                    transcript_text: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_parse_numeral_table() {
        assert_eq!(parse_numeral("2"), Some(2));
        assert_eq!(parse_numeral("12"), Some(12));
        assert_eq!(parse_numeral("一"), Some(1));
        assert_eq!(parse_numeral("两"), Some(2));
        assert_eq!(parse_numeral("九"), Some(9));
        assert_eq!(parse_numeral("十"), Some(10));
        assert_eq!(parse_numeral("十三"), Some(13));
        assert_eq!(parse_numeral("二十"), Some(20));
        assert_eq!(parse_numeral("四十二"), Some(42));
        assert_eq!(parse_numeral("胡"), None);
    }

    #[tokio::test]
    async fn test_ordinal_second_item() {
        let result = OrdinalStrategy::new()
            .evaluate("第二个", &catalog(3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.target, MatchTarget::Item(1));
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.strategy, "ordinal");
    }

    #[tokio::test]
    async fn test_ordinal_embedded_in_sentence() {
        let result = OrdinalStrategy::new()
            .evaluate("播放第3个视频", &catalog(5))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.target, MatchTarget::Item(2));
    }

    #[tokio::test]
    async fn test_ordinal_bare_number_with_suffix() {
        let result = OrdinalStrategy::new()
            .evaluate("2号", &catalog(3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.target, MatchTarget::Item(1));
    }

    #[tokio::test]
    async fn test_ordinal_out_of_range_is_no_match() {
        let strategy = OrdinalStrategy::new();
        assert!(strategy.evaluate("第五个", &catalog(3)).await.unwrap().is_none());
        assert!(strategy.evaluate("第零个", &catalog(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ordinal_plain_speech_is_no_match() {
        let strategy = OrdinalStrategy::new();
        assert!(strategy.evaluate("你好", &catalog(3)).await.unwrap().is_none());
        // A number buried in plain speech without an ordinal marker
        assert!(strategy
            .evaluate("我有3个问题想问", &catalog(9))
            .await
            .unwrap()
            .is_none());
    }
}
