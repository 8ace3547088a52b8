//! Serper (google.serper.dev) provider.

use super::{OrganicResult, RelatedQuestion, SearchError, SearchProvider, SearchResults};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://google.serper.dev";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Serper wire format (the fields we consume).
#[derive(Deserialize)]
struct SerperResponse {
    #[serde(rename = "answerBox")]
    answer_box: Option<SerperAnswerBox>,
    #[serde(default)]
    organic: Vec<SerperOrganic>,
    #[serde(rename = "peopleAlsoAsk", default)]
    people_also_ask: Vec<SerperQuestion>,
}

#[derive(Deserialize)]
struct SerperAnswerBox {
    answer: Option<String>,
    snippet: Option<String>,
}

#[derive(Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct SerperQuestion {
    #[serde(default)]
    question: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperProvider {
    api_key: String,
    base_url: String,
    client: Client,
}

impl SerperProvider {
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
impl SearchProvider for SerperProvider {
    fn name(&self) -> &'static str {
        "serper"
    }

    async fn search(&self, query: &str) -> Result<SearchResults, SearchError> {
        let url = format!("{}/search", self.base_url);
        let body = json!({
            "q": query,
            "gl": "gb",
            "hl": "en",
            "num": 10,
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&body)
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

        let parsed: SerperResponse = response.json().await.map_err(|e| {
            SearchError::InvalidResponse(format!("Failed to parse Serper response: {e}"))
        })?;

        Ok(SearchResults {
            answer_box: parsed.answer_box.as_ref().and_then(|b| b.answer.clone()),
            featured_snippet: parsed.answer_box.as_ref().and_then(|b| b.snippet.clone()),
            organic: parsed
                .organic
                .into_iter()
                .map(|o| OrganicResult {
                    title: o.title,
                    url: o.link,
                    snippet: o.snippet,
                })
                .collect(),
            related_questions: parsed
                .people_also_ask
                .into_iter()
                .map(|q| RelatedQuestion {
                    question: q.question,
                    snippet: q.snippet,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_mapping() {
        let raw = r#"{
            "answerBox": {"answer": "E13 is a drainage fault", "snippet": "Check the pump filter"},
            "organic": [
                {"title": "Bosch E13 explained", "link": "https://example.com/e13", "snippet": "E13 means the machine cannot drain"}
            ],
            "peopleAlsoAsk": [
                {"question": "What does E13 mean?", "snippet": "A drainage problem"}
            ]
        }"#;
        let parsed: SerperResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(parsed.answer_box.as_ref().unwrap().answer.as_deref(), Some("E13 is a drainage fault"));
        assert_eq!(parsed.organic.len(), 1);
        assert_eq!(parsed.organic[0].link, "https://example.com/e13");
        assert_eq!(parsed.people_also_ask[0].question, "What does E13 mean?");
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let parsed: SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.answer_box.is_none());
        assert!(parsed.organic.is_empty());
        assert!(parsed.people_also_ask.is_empty());
    }
}
