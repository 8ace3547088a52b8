//! Web search providers.
//!
//! Two interchangeable providers sit behind the [`SearchProvider`]
//! strategy trait: Serper (primary) and SerpApi (secondary). Which one
//! runs is decided once at startup from the configured credentials,
//! never re-checked per request.

pub mod enrichment;
pub mod serpapi;
pub mod serper;

pub use enrichment::{gather_enrichment, Enrichment};
pub use serpapi::SerpApiProvider;
pub use serper::SerperProvider;

use crate::config::SearchConfig;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from a single search call. Enrichment swallows these per
/// query; they never reach the engine's caller.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// An organic search result.
#[derive(Debug, Clone, Default)]
pub struct OrganicResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A "people also ask" entry.
#[derive(Debug, Clone, Default)]
pub struct RelatedQuestion {
    pub question: String,
    pub snippet: String,
}

/// Provider-neutral search results.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub answer_box: Option<String>,
    pub featured_snippet: Option<String>,
    pub organic: Vec<OrganicResult>,
    pub related_questions: Vec<RelatedQuestion>,
}

/// Strategy interface over the two search backends. Results are
/// restricted to GB so error-code explanations match UK models.
#[async_trait]
pub trait SearchProvider: Send + Sync + 'static {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str) -> Result<SearchResults, SearchError>;
}

/// Resolve the active provider from configured credentials.
///
/// Serper takes priority when both keys are present. Returns `None` when
/// neither is configured, which disables enrichment entirely.
pub fn provider_from_config(config: &SearchConfig) -> Option<Arc<dyn SearchProvider>> {
    if let Some(key) = config.serper_api_key() {
        info!("Web search enrichment: Serper");
        return Some(Arc::new(SerperProvider::new(key)));
    }
    if let Some(key) = config.serpapi_api_key() {
        info!("Web search enrichment: SerpApi");
        return Some(Arc::new(SerpApiProvider::new(key)));
    }
    info!("Web search enrichment disabled: no provider key configured");
    None
}
