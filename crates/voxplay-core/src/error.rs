use crate::types::SessionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(SessionId),

    #[error("session already active: {0}")]
    Conflict(SessionId),

    #[error("session not accepting audio: {0}")]
    NotStreaming(SessionId),
}

#[derive(Debug, Clone, Error)]
pub enum RecognizerError {
    #[error("recognizer connection failed: {0}")]
    ConnectionFailed(String),

    #[error("no valid audio in stream: {0}")]
    NoValidAudio(String),

    #[error("recognizer completion timed out after {0}ms")]
    CompletionTimeout(u64),

    #[error("recognizer provider not found: {0}")]
    ProviderNotFound(String),
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("classifier request failed: {0}")]
    ClassifierFailed(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read media directory: {0}")]
    DirRead(#[from] std::io::Error),
}
