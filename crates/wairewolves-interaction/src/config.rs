//! Credentials for the LLM backends.
//!
//! Secrets are read from `secret.json` in the wairewolves configuration
//! directory (`~/.config/wairewolves/secret.json` on Linux), falling back to
//! environment variables.

use crate::error::InteractionError;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Root structure of secret.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
    /// Alternative API root for OpenAI-compatible servers
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: None,
            base_url: None,
            organization: None,
            max_tokens: None,
        }
    }

    /// Loads the configuration from secret.json or environment variables.
    ///
    /// Priority:
    /// 1. `openai` section of secret.json
    /// 2. `OPENAI_API_KEY`, `OPENAI_MODEL_NAME`, `OPENAI_BASE_URL`, `OPENAI_ORGANIZATION`
    pub fn try_from_env() -> Result<Self, InteractionError> {
        match load_secret_config() {
            Ok(SecretConfig {
                openai: Some(config),
            }) => return Ok(config),
            Ok(_) => tracing::debug!("secret.json has no openai section"),
            Err(err) => tracing::debug!("{}", err),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InteractionError> {
        let api_key = lookup("OPENAI_API_KEY").ok_or_else(|| {
            InteractionError::config(
                "OPENAI_API_KEY not found in secret.json or environment variables",
            )
        })?;
        Ok(Self {
            api_key,
            model_name: lookup("OPENAI_MODEL_NAME"),
            base_url: lookup("OPENAI_BASE_URL"),
            organization: lookup("OPENAI_ORGANIZATION"),
            max_tokens: None,
        })
    }

    pub fn model(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL)
    }

    /// URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

/// Loads the secret configuration from the default location.
pub fn load_secret_config() -> Result<SecretConfig, InteractionError> {
    load_secret_config_from(&secret_config_path()?)
}

pub fn load_secret_config_from(path: &Path) -> Result<SecretConfig, InteractionError> {
    if !path.exists() {
        return Err(InteractionError::config(format!(
            "Configuration file not found at: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        InteractionError::config(format!(
            "Failed to read configuration file at {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        InteractionError::config(format!(
            "Failed to parse configuration file at {}: {}",
            path.display(),
            e
        ))
    })
}

/// Returns the path to the secret file: `<config_dir>/wairewolves/secret.json`
pub fn secret_config_path() -> Result<PathBuf, InteractionError> {
    let base = dirs::config_dir()
        .ok_or_else(|| InteractionError::config("Could not determine configuration directory"))?;
    Ok(base.join("wairewolves").join("secret.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_requires_api_key() {
        let err = OpenAiConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, InteractionError::Config(_)));
    }

    #[test]
    fn test_lookup_reads_optional_values() {
        let vars: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL_NAME", "gpt-4o-mini"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
        ]
        .into_iter()
        .collect();

        let config = OpenAiConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.organization, None);
    }

    #[test]
    fn test_defaults() {
        let config = OpenAiConfig::new("sk-test");
        assert_eq!(config.model(), DEFAULT_OPENAI_MODEL);
        assert_eq!(
            config.endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
