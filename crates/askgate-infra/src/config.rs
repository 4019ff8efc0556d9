//! Configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.askgate/` by default) and
//! deserializes it into [`AppConfig`]. Falls back to defaults when the file
//! is missing or malformed. Credentials never live in the file: the LLM API
//! key comes from the environment and is wrapped in a secret type.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use askgate_types::config::AppConfig;

/// Resolve the data directory: `ASKGATE_DATA_DIR` env var, falling back to
/// `~/.askgate` (or `./.askgate` when no home directory is available).
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ASKGATE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".askgate")
}

/// Load configuration from `{data_dir}/config.toml`, then apply env
/// overrides.
///
/// - Missing file: defaults, logged at debug.
/// - Unreadable or unparseable file: defaults, logged at warn.
/// - `ASKGATE_ADMIN_EMAIL` overrides `[quota].admin_email` when set.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                AppConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    };

    if let Ok(admin) = std::env::var("ASKGATE_ADMIN_EMAIL") {
        if !admin.trim().is_empty() {
            config.quota.admin_email = Some(admin);
        }
    }

    config
}

/// Resolve the LLM API key from `OPENAI_API_KEY`, if present.
pub fn resolve_api_key() -> Option<SecretString> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}
