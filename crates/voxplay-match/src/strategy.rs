use async_trait::async_trait;
use voxplay_core::{Catalog, MatchError, MatchResult, StrategyMode};

/// A pluggable heuristic mapping a final transcript to a playback action.
///
/// `Ok(None)` means "this strategy has nothing to say" and is the normal
/// miss path; `Err` is reserved for infrastructure failure and is absorbed
/// by the engine. Registered strategies are ranked by `priority`
/// (higher decides first), with registration order breaking ties.
#[async_trait]
pub trait MatchStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn priority(&self) -> i32;

    /// `Sync` strategies must not suspend; `Async` ones may hit the network.
    fn mode(&self) -> StrategyMode;

    async fn evaluate(
        &self,
        transcript: &str,
        catalog: &Catalog,
    ) -> Result<Option<MatchResult>, MatchError>;
}
