use crate::error::ConfigError;
use crate::types::{ControlAction, HotWord};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub recognizer: RecognizerConfig,

    #[serde(default)]
    pub hot_words: HotWordsConfig,

    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    #[serde(default = "default_media_dir")]
    pub dir: String,

    /// Catalog item kept first regardless of name order.
    #[serde(default = "default_lead_item")]
    pub lead_item: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: default_media_dir(),
            lead_item: default_lead_item(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecognizerConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_format")]
    pub format: String,

    /// Per-session audio queue capacity; overflow drops the oldest frame.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// How long stop() waits for the recognizer to acknowledge completion.
    #[serde(default = "default_stop_grace_ms")]
    pub stop_grace_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            sample_rate: default_sample_rate(),
            format: default_format(),
            queue_capacity: default_queue_capacity(),
            stop_grace_ms: default_stop_grace_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HotWordsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub words: Vec<HotWord>,
}

impl Default for HotWordsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            words: Vec::new(),
        }
    }
}

impl HotWordsConfig {
    /// Snapshot of the hot words to hand a new session; empty when disabled.
    pub fn active_words(&self) -> Vec<HotWord> {
        if self.enabled {
            self.words.clone()
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Shared deadline for awaiting async strategies, per resolution.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum token-overlap score for a reference-text match.
    #[serde(default = "default_min_overlap")]
    pub min_overlap: f64,

    /// Length of the reference-text leading segment that gets double weight.
    #[serde(default = "default_lead_chars")]
    pub lead_chars: usize,

    /// Applied by the dispatcher when resolution ends in no match.
    #[serde(default = "default_action")]
    pub default_action: ControlAction,

    #[serde(default)]
    pub keywords: KeywordsConfig,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            min_overlap: default_min_overlap(),
            lead_chars: default_lead_chars(),
            default_action: default_action(),
            keywords: KeywordsConfig::default(),
        }
    }
}

/// Control-action vocabulary for the keyword strategy.
#[derive(Debug, Deserialize, Clone)]
pub struct KeywordsConfig {
    #[serde(default = "default_pause_words")]
    pub pause: Vec<String>,

    #[serde(default = "default_resume_words")]
    pub resume: Vec<String>,

    #[serde(default = "default_advance_words")]
    pub advance: Vec<String>,

    #[serde(default = "default_retreat_words")]
    pub retreat: Vec<String>,

    #[serde(default = "default_restart_words")]
    pub restart: Vec<String>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            pause: default_pause_words(),
            resume: default_resume_words(),
            advance: default_advance_words(),
            retreat: default_retreat_words(),
            restart: default_restart_words(),
        }
    }
}

impl KeywordsConfig {
    /// Vocabulary as (action, words) pairs, in a fixed evaluation order.
    pub fn entries(&self) -> Vec<(ControlAction, &[String])> {
        vec![
            (ControlAction::Pause, self.pause.as_slice()),
            (ControlAction::Resume, self.resume.as_slice()),
            (ControlAction::Advance, self.advance.as_slice()),
            (ControlAction::Retreat, self.retreat.as_slice()),
            (ControlAction::Restart, self.restart.as_slice()),
        ]
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_media_dir() -> String {
    "videos".to_string()
}

fn default_lead_item() -> String {
    "introduction".to_string()
}

fn default_provider() -> String {
    "null".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_format() -> String {
    "pcm".to_string()
}

fn default_queue_capacity() -> usize {
    64
}

fn default_stop_grace_ms() -> u64 {
    3000
}

fn default_true() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_min_overlap() -> f64 {
    0.35
}

fn default_lead_chars() -> usize {
    80
}

fn default_action() -> ControlAction {
    ControlAction::Advance
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_pause_words() -> Vec<String> {
    strings(&["暂停", "停一下", "pause"])
}

fn default_resume_words() -> Vec<String> {
    strings(&["继续播放", "继续", "resume", "continue"])
}

fn default_advance_words() -> Vec<String> {
    strings(&["下一个", "下一段", "next"])
}

fn default_retreat_words() -> Vec<String> {
    strings(&["上一个", "上一段", "previous"])
}

fn default_restart_words() -> Vec<String> {
    strings(&["重新开始", "从头开始", "重播", "restart"])
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_valid_toml() {
        let toml_str = r#"
[general]
log_level = "debug"

[media]
dir = "clips"
lead_item = "welcome"

[recognizer]
provider = "null"
sample_rate = 8000
queue_capacity = 16
stop_grace_ms = 500

[hot_words]
enabled = true

[[hot_words.words]]
word = "产品"
weight = 5

[[hot_words.words]]
word = "价格"
weight = 3

[matching]
timeout_ms = 1500
min_overlap = 0.5
default_action = "retreat"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.media.dir, "clips");
        assert_eq!(config.media.lead_item, "welcome");
        assert_eq!(config.recognizer.sample_rate, 8000);
        assert_eq!(config.recognizer.queue_capacity, 16);
        assert_eq!(config.recognizer.stop_grace_ms, 500);
        assert_eq!(config.hot_words.words.len(), 2);
        assert_eq!(config.hot_words.words[0].word, "产品");
        assert_eq!(config.hot_words.words[0].weight, 5);
        assert_eq!(config.matching.timeout_ms, 1500);
        assert_eq!(config.matching.min_overlap, 0.5);
        assert_eq!(config.matching.default_action, ControlAction::Retreat);
    }

    #[test]
    fn test_config_default_values() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.media.dir, "videos");
        assert_eq!(config.media.lead_item, "introduction");
        assert_eq!(config.recognizer.provider, "null");
        assert_eq!(config.recognizer.sample_rate, 16000);
        assert_eq!(config.recognizer.format, "pcm");
        assert_eq!(config.recognizer.queue_capacity, 64);
        assert_eq!(config.recognizer.stop_grace_ms, 3000);
        assert!(config.hot_words.enabled);
        assert!(config.hot_words.words.is_empty());
        assert_eq!(config.matching.timeout_ms, 3000);
        assert_eq!(config.matching.default_action, ControlAction::Advance);
    }

    #[test]
    fn test_config_default_keywords() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert!(config.matching.keywords.pause.iter().any(|w| w == "暂停"));
        assert!(config.matching.keywords.advance.iter().any(|w| w == "下一个"));
        let entries = config.matching.keywords.entries();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].0, ControlAction::Pause);
    }

    #[test]
    fn test_config_keyword_override() {
        let toml_str = r#"
[matching.keywords]
pause = ["hold on"]
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.matching.keywords.pause, vec!["hold on".to_string()]);
        // Unspecified actions keep their defaults
        assert!(config.matching.keywords.resume.iter().any(|w| w == "继续"));
    }

    #[test]
    fn test_hot_words_disabled_yields_empty_snapshot() {
        let toml_str = r#"
[hot_words]
enabled = false

[[hot_words.words]]
word = "产品"
weight = 5
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.hot_words.words.len(), 1);
        assert!(config.hot_words.active_words().is_empty());
    }

    #[test]
    fn test_config_env_var_interpolation() {
        std::env::set_var("VOXPLAY_TEST_DIR", "env_videos");
        let toml_str = r#"
[media]
dir = "${VOXPLAY_TEST_DIR}"
"#;
        let config = AppConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.media.dir, "env_videos");
        std::env::remove_var("VOXPLAY_TEST_DIR");
    }

    #[test]
    fn test_config_missing_env_var_error() {
        let toml_str = r#"
[media]
dir = "${DEFINITELY_DOES_NOT_EXIST_54321}"
"#;
        let result = AppConfig::from_toml_str(toml_str);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("DEFINITELY_DOES_NOT_EXIST_54321"),
        );
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let toml_str = "this is not valid toml [[[";
        assert!(AppConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_config_invalid_default_action() {
        let toml_str = r#"
[matching]
default_action = "explode"
"#;
        assert!(AppConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = std::env::temp_dir().join("voxplay_test_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.toml");
        std::fs::write(
            &path,
            r#"
[general]
log_level = "warn"

[recognizer]
sample_rate = 44100
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.recognizer.sample_rate, 44100);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_config_load_from_file_not_found() {
        let result = AppConfig::load_from_file(std::path::Path::new("/nonexistent/path.toml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to read config file"),
        );
    }
}
