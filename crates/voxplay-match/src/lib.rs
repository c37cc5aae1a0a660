//! Transcript-to-action matching for voxplay.
//!
//! A [`MatchEngine`] holds an ordered set of [`MatchStrategy`]
//! implementations and resolves each final transcript to at most one
//! [`voxplay_core::MatchResult`]. Fast lexical strategies run inline;
//! the contextual classifier runs concurrently and is only consulted
//! when every lexical strategy misses.

pub mod classifier;
pub mod contextual;
pub mod engine;
pub mod identifier;
pub mod keyword;
pub mod ordinal;
pub mod reference;
pub mod strategy;
pub mod text;

pub use classifier::{Classifier, NullClassifier};
pub use contextual::ContextualStrategy;
pub use engine::MatchEngine;
pub use identifier::IdentifierStrategy;
pub use keyword::KeywordStrategy;
pub use ordinal::OrdinalStrategy;
pub use reference::ReferenceTextStrategy;
pub use strategy::MatchStrategy;
