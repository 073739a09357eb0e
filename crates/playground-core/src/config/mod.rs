use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{defaults, endpoints, models};
use crate::error::PlaygroundError;
use crate::gateway::{CompletionGateway, TurnOptions};
use crate::llm::HuggingFaceClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model used for new turns.
    pub model: String,
    /// Models offered for selection.
    pub models: Vec<String>,
    pub max_tokens: u32,
    /// Environment variable consulted when no token is given explicitly.
    pub token_env: String,
    pub base_url: String,
    pub system_prompt: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: defaults::MODEL.to_string(),
            models: models::SELECTABLE.iter().map(|m| m.to_string()).collect(),
            max_tokens: defaults::MAX_TOKENS,
            token_env: defaults::TOKEN_ENV.to_string(),
            base_url: endpoints::HF_INFERENCE_BASE_URL.to_string(),
            system_prompt: defaults::SYSTEM_PROMPT.to_string(),
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("llm-playground")
            .join("config.toml")
    }

    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(path = %path.display(), "ignoring invalid config: {e}"),
                },
                Err(e) => tracing::warn!(path = %path.display(), "cannot read config: {e}"),
            }
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PlaygroundError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PlaygroundError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Token to use for a turn: `explicit` when non-empty, else the
    /// environment variable named by `token_env`. Always trimmed; may be empty.
    pub fn resolve_token(&self, explicit: Option<&str>) -> String {
        let raw = match explicit.filter(|s| !s.is_empty()) {
            Some(value) => value.to_string(),
            None => std::env::var(&self.token_env).unwrap_or_default(),
        };
        raw.trim().to_string()
    }

    pub fn turn_options(&self) -> TurnOptions {
        TurnOptions::new(self.model.clone(), self.max_tokens)
    }

    /// Build the Hugging Face backed gateway from the current settings.
    pub fn build_gateway(&self) -> Result<CompletionGateway, PlaygroundError> {
        let client = HuggingFaceClient::with_timeout(Duration::from_secs(self.timeout_secs))?
            .with_base_url(self.base_url.clone());
        Ok(CompletionGateway::new(Box::new(client)).with_system_prompt(self.system_prompt.clone()))
    }
}
