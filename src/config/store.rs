//! Diagnosis store configuration

use serde::{Deserialize, Serialize};

/// Supabase project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Project base URL, e.g. "https://abc.supabase.co".
    pub url: String,
    /// Environment variable holding the service-role key.
    pub service_key_env: String,
    /// Submissions table.
    pub table: String,
    /// Fuzzy-match stored procedure.
    pub rpc: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            service_key_env: "SUPABASE_SERVICE_KEY".to_string(),
            table: "diagnostic_submissions".to_string(),
            rpc: "match_diagnoses".to_string(),
        }
    }
}

impl StoreConfig {
    /// Resolve the service key, falling back to an anonymous key for
    /// local development stacks that accept it.
    pub fn service_key(&self) -> String {
        std::env::var(&self.service_key_env).unwrap_or_default()
    }
}
