//! Service configuration.
//!
//! Deserialized from `config.toml` in the data directory. Every field has a
//! default so a missing or partial file still yields a working configuration.
//! The LLM API key is deliberately not part of the file; it is resolved from
//! the environment by the infra loader and wrapped in a secret type there.

use serde::Deserialize;

/// Top-level configuration for the Askgate service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub quota: QuotaConfig,
    pub llm: LlmConfig,
    pub session: SessionConfig,
}

/// Daily quota settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    /// Questions per UTC day for non-admin users.
    pub daily_limit: u32,
    /// Email granted unlimited quota and reset rights. Compared
    /// case-insensitively against normalized request emails.
    pub admin_email: Option<String>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_limit: 10,
            admin_email: None,
        }
    }
}

/// Answer generator settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    /// Upper bound on one generation call; on expiry the request fails
    /// with an upstream error and no further mutation happens.
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.2,
            request_timeout_secs: 60,
        }
    }
}

/// In-memory session transcript settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Per-user transcript cap; the oldest turns are evicted past this.
    pub max_turns_per_user: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns_per_user: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.quota.daily_limit, 10);
        assert!(config.quota.admin_email.is_none());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.request_timeout_secs, 60);
        assert_eq!(config.session.max_turns_per_user, 50);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[quota]
daily_limit = 25
admin_email = "admin@x.com"
"#,
        )
        .unwrap();
        assert_eq!(config.quota.daily_limit, 25);
        assert_eq!(config.quota.admin_email.as_deref(), Some("admin@x.com"));
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_full_toml_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
[llm]
model = "gpt-4o"
base_url = "http://localhost:11434/v1"
temperature = 0.7
request_timeout_secs = 30

[session]
max_turns_per_user = 5
"#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(config.llm.request_timeout_secs, 30);
        assert_eq!(config.session.max_turns_per_user, 5);
    }
}
