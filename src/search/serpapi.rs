//! SerpApi (serpapi.com) provider.

use super::{OrganicResult, RelatedQuestion, SearchError, SearchProvider, SearchResults};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct SerpApiResponse {
    answer_box: Option<SerpApiAnswerBox>,
    #[serde(default)]
    organic_results: Vec<SerpApiOrganic>,
    #[serde(default)]
    related_questions: Vec<SerpApiQuestion>,
}

#[derive(Deserialize)]
struct SerpApiAnswerBox {
    answer: Option<String>,
    snippet: Option<String>,
}

#[derive(Deserialize)]
struct SerpApiOrganic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct SerpApiQuestion {
    #[serde(default)]
    question: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerpApiProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl SerpApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Construct against a custom endpoint (for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        let url = format!("{}/search.json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("gl", "gb"),
                ("hl", "en"),
                ("api_key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(SEARCH_TIMEOUT.as_millis() as u64)
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SerpApiResponse = response.json().await.map_err(|e| {
            SearchError::InvalidResponse(format!("Failed to parse SerpApi response: {e}"))
        })?;

        Ok(SearchResults {
            answer_box: parsed.answer_box.as_ref().and_then(|b| b.answer.clone()),
            featured_snippet: parsed.answer_box.as_ref().and_then(|b| b.snippet.clone()),
            organic: parsed
                .organic_results
                .into_iter()
                .map(|o| OrganicResult {
                    title: o.title,
                    url: o.link,
                    snippet: o.snippet,
                })
                .collect(),
            related_questions: parsed
                .related_questions
                .into_iter()
                .map(|q| RelatedQuestion {
                    question: q.question,
                    snippet: q.snippet,
                })
                .collect(),
        })
    }
}
