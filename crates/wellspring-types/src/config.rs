//! Application configuration types.
//!
//! Deserialized from `wellspring.toml` by the infra loader; every field
//! has a default so a missing or partial file still yields a usable
//! configuration.

use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;

/// Hard bounds on the history fetch limit.
const HISTORY_LIMIT_MIN: u32 = 1;
const HISTORY_LIMIT_MAX: u32 = 100;

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_history_limit() -> u32 {
    20
}

fn default_database_url() -> String {
    "sqlite://wellspring.db?mode=rwc".to_string()
}

fn default_chat_table() -> String {
    "chat_messages".to_string()
}

fn default_summary_table() -> String {
    "session_summaries".to_string()
}

fn default_newsletter_table() -> String {
    "newsletter_signups".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_api_key() -> SecretString {
    SecretString::from("")
}

/// Built-in system preambles keyed by language code.
fn default_languages() -> HashMap<String, String> {
    let mut languages = HashMap::new();
    languages.insert(
        "en".to_string(),
        "You are a helpful product support assistant. Answer concisely and \
         ground your answers in the conversation so far."
            .to_string(),
    );
    languages.insert(
        "es".to_string(),
        "Eres un asistente de soporte de producto. Responde de forma concisa \
         y basa tus respuestas en la conversación."
            .to_string(),
    );
    languages
}

/// Full application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Model identifier sent to the completion provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Bound on a single completion call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of history messages fetched per request.
    /// Use [`AppConfig::history_limit`] to read the clamped value.
    #[serde(default = "default_history_limit")]
    history_limit: u32,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_chat_table")]
    pub chat_table: String,

    #[serde(default = "default_summary_table")]
    pub summary_table: String,

    #[serde(default = "default_newsletter_table")]
    pub newsletter_table: String,

    /// Completion provider API key. Never logged or serialized.
    #[serde(default = "default_api_key")]
    pub api_key: SecretString,

    /// Optional base URL override for OpenAI-compatible endpoints.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Language used when the caller's language is absent or unrecognized.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// System preamble per language code.
    #[serde(default = "default_languages")]
    pub languages: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            history_limit: default_history_limit(),
            database_url: default_database_url(),
            chat_table: default_chat_table(),
            summary_table: default_summary_table(),
            newsletter_table: default_newsletter_table(),
            api_key: default_api_key(),
            api_base_url: None,
            default_language: default_language(),
            languages: default_languages(),
        }
    }
}

impl AppConfig {
    /// History fetch limit, clamped to the supported 1..=100 range.
    pub fn history_limit(&self) -> u32 {
        self.history_limit
            .clamp(HISTORY_LIMIT_MIN, HISTORY_LIMIT_MAX)
    }

    /// Set the raw history limit (primarily for tests and the loader).
    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.history_limit(), 20);
        assert_eq!(config.default_language, "en");
        assert!(config.languages.contains_key("en"));
    }

    #[test]
    fn test_history_limit_clamped() {
        let config = AppConfig::default().with_history_limit(0);
        assert_eq!(config.history_limit(), 1);
        let config = AppConfig::default().with_history_limit(500);
        assert_eq!(config.history_limit(), 100);
        let config = AppConfig::default().with_history_limit(42);
        assert_eq!(config.history_limit(), 42);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        // Only a couple of fields set; everything else should default.
        let config: AppConfig = toml::from_str(
            r#"
model = "gpt-4o"
history_limit = 50
"#,
        )
        .unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.history_limit(), 50);
        assert_eq!(config.chat_table, "chat_messages");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
