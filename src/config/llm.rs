//! LLM backend configuration

use serde::{Deserialize, Serialize};

/// Chat-completion backend settings.
///
/// The API key never lives in the config file; `api_key_env` names the
/// environment variable that holds it. No key configured means the
/// pipeline runs cache-or-fallback only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible endpoint base URL.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    /// Kept low: replies are parsed by section heading.
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 1200,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the environment, treating empty as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
