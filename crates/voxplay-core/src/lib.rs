pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, GeneralConfig, HotWordsConfig, KeywordsConfig, MatchingConfig, MediaConfig,
    RecognizerConfig,
};
pub use error::{CatalogError, ConfigError, MatchError, RecognizerError, SessionError};
pub use types::{
    Catalog, CatalogItem, ControlAction, HotWord, MatchResult, MatchTarget, RecognizerEvent,
    SessionEvent, SessionId, SessionStatus, StrategyMode, StreamConfig,
};
