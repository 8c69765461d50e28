//! Configuration loader for Wellspring.
//!
//! Reads a TOML config file and deserializes it into
//! [`AppConfig`]. Falls back to defaults when the file is missing or
//! malformed, so the service always starts with a usable configuration.
//! The provider API key may be supplied via the `WELLSPRING_API_KEY`
//! environment variable, which takes precedence over the file.

use std::path::Path;

use secrecy::SecretString;
use wellspring_types::config::AppConfig;

/// Load configuration from the given path.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
/// - `WELLSPRING_API_KEY`, when set, overrides the file's `api_key`.
pub async fn load_config(path: &Path) -> AppConfig {
    let mut config = read_config_file(path).await;

    if let Ok(key) = std::env::var("WELLSPRING_API_KEY") {
        config.api_key = SecretString::from(key);
    }

    config
}

async fn read_config_file(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}
