//! Web search provider configuration

use serde::{Deserialize, Serialize};

/// Search provider credentials, by environment variable name.
///
/// Serper is the primary provider; SerpApi is used only when no Serper
/// key is present. With neither configured, enrichment is skipped and
/// the LLM is queried without web context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub serper_api_key_env: String,
    pub serpapi_api_key_env: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            serper_api_key_env: "SERPER_API_KEY".to_string(),
            serpapi_api_key_env: "SERPAPI_API_KEY".to_string(),
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|key| !key.trim().is_empty())
}

impl SearchConfig {
    pub fn serper_api_key(&self) -> Option<String> {
        env_key(&self.serper_api_key_env)
    }

    pub fn serpapi_api_key(&self) -> Option<String> {
        env_key(&self.serpapi_api_key_env)
    }
}
