use crate::classifier::Classifier;
use crate::contextual::ContextualStrategy;
use crate::identifier::IdentifierStrategy;
use crate::keyword::KeywordStrategy;
use crate::ordinal::OrdinalStrategy;
use crate::reference::ReferenceTextStrategy;
use crate::strategy::MatchStrategy;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use voxplay_core::{Catalog, MatchResult, MatchingConfig, StrategyMode};

/// Resolves one final transcript to at most one `MatchResult` by racing
/// registered strategies.
///
/// Async strategies launch the moment resolution starts; sync strategies
/// then run inline in descending priority, and the first hit wins without
/// waiting on the async tier. Only when every sync strategy misses are the
/// async tasks awaited, in priority order, under a single shared deadline.
/// Priority is the sole decision axis; confidence and arrival timing never
/// reorder results.
pub struct MatchEngine {
    strategies: Vec<Arc<dyn MatchStrategy>>,
    timeout: Duration,
}

impl MatchEngine {
    pub fn new(timeout: Duration) -> Self {
        Self {
            strategies: Vec::new(),
            timeout,
        }
    }

    /// Engine with the built-in strategy stack configured from `config`.
    pub fn with_defaults(config: &MatchingConfig, classifier: Arc<dyn Classifier>) -> Self {
        let mut engine = Self::new(Duration::from_millis(config.timeout_ms));
        engine.register(Arc::new(KeywordStrategy::new(&config.keywords)));
        engine.register(Arc::new(IdentifierStrategy));
        engine.register(Arc::new(OrdinalStrategy::new()));
        engine.register(Arc::new(ReferenceTextStrategy::new(
            config.min_overlap,
            config.lead_chars,
        )));
        engine.register(Arc::new(ContextualStrategy::new(classifier)));
        engine
    }

    /// Register a strategy. Stable insertion: equal priorities keep
    /// registration order, making resolution fully deterministic.
    pub fn register(&mut self, strategy: Arc<dyn MatchStrategy>) {
        self.strategies.push(strategy);
        self.strategies
            .sort_by_key(|s| std::cmp::Reverse(s.priority()));
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, transcript: &str, catalog: Arc<Catalog>) -> Option<MatchResult> {
        let transcript = transcript.trim();

        // Launch the slow tier first so it overlaps the sync sweep.
        let mut pending: Vec<(String, JoinHandle<Option<MatchResult>>)> = Vec::new();
        for strategy in self
            .strategies
            .iter()
            .filter(|s| s.mode() == StrategyMode::Async)
        {
            let strategy = Arc::clone(strategy);
            let transcript = transcript.to_string();
            let catalog = Arc::clone(&catalog);
            let name = strategy.name().to_string();
            let handle = tokio::spawn(async move {
                match strategy.evaluate(&transcript, &catalog).await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::warn!(strategy = %strategy.name(), "strategy failed: {e}");
                        None
                    }
                }
            });
            pending.push((name, handle));
        }

        for strategy in self
            .strategies
            .iter()
            .filter(|s| s.mode() == StrategyMode::Sync)
        {
            match strategy.evaluate(transcript, &catalog).await {
                Ok(Some(result)) => {
                    tracing::info!(
                        strategy = %result.strategy,
                        confidence = result.confidence,
                        "sync strategy matched: {}",
                        result.reason
                    );
                    // Detached async tasks may run to completion; their
                    // results are discarded.
                    return Some(result);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(strategy = %strategy.name(), "strategy failed: {e}");
                }
            }
        }

        // Fallback tier: one deadline shared by every pending strategy.
        let deadline = tokio::time::Instant::now() + self.timeout;
        for (name, handle) in pending {
            match tokio::time::timeout_at(deadline, handle).await {
                Ok(Ok(Some(result))) => {
                    tracing::info!(
                        strategy = %result.strategy,
                        confidence = result.confidence,
                        "async strategy matched: {}",
                        result.reason
                    );
                    return Some(result);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    tracing::warn!(strategy = %name, "strategy task failed: {e}");
                }
                Err(_) => {
                    tracing::warn!(strategy = %name, "resolution deadline hit awaiting strategy");
                }
            }
        }

        tracing::debug!("no strategy matched transcript");
        None
    }
}
