//! Supabase (PostgREST) store adapter.
//!
//! Similarity search goes through the `match_diagnoses` stored procedure
//! via the RPC endpoint; inserts go straight to the submissions table.
//! The service key is sent as both `apikey` and bearer token, which is
//! how PostgREST expects service-role access.

use super::{CachedRecord, DiagnosisStore, SimilarityQuery, StoreError};
use crate::diagnosis::record::DiagnosisRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const INSERT_TIMEOUT: Duration = Duration::from_secs(10);

/// RPC argument payload for the fuzzy-match procedure.
#[derive(Serialize)]
struct MatchArgs<'a> {
    p_appliance: &'a str,
    p_brand: &'a str,
    p_problem: &'a str,
    p_error_code: Option<&'a str>,
    p_threshold: f32,
}

pub struct SupabaseStore {
    /// Project base URL, e.g. "https://abc.supabase.co".
    base_url: String,
    service_key: String,
    /// Submissions table name.
    table: String,
    /// Fuzzy-match stored procedure name.
    rpc: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(base_url: String, service_key: String, table: String, rpc: String) -> Self {
        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self::with_client(base_url, service_key, table, rpc, client)
    }

    /// Construct with a custom HTTP client (for testing).
    pub fn with_client(
        base_url: String,
        service_key: String,
        table: String,
        rpc: String,
        client: Client,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            table,
            rpc,
            client,
        }
    }

    fn map_send_error(e: reqwest::Error, timeout: Duration) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(timeout.as_millis() as u64)
        } else {
            StoreError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl DiagnosisStore for SupabaseStore {
    async fn search_similar(
        &self,
        query: &SimilarityQuery,
    ) -> Result<Vec<CachedRecord>, StoreError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, self.rpc);
        let args = MatchArgs {
            p_appliance: &query.appliance,
            p_brand: &query.brand,
            p_problem: &query.problem,
            p_error_code: query.error_code.as_deref(),
            p_threshold: query.threshold,
        };

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("authorization", format!("Bearer {}", self.service_key))
            .json(&args)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, SEARCH_TIMEOUT))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<Vec<CachedRecord>>().await.map_err(|e| {
            StoreError::InvalidResponse(format!("Failed to parse match response: {e}"))
        })
    }

    async fn insert(&self, record: &DiagnosisRecord) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("authorization", format!("Bearer {}", self.service_key))
            .header("prefer", "return=minimal")
            .json(record)
            .timeout(INSERT_TIMEOUT)
            .send()
            .await
            .map_err(|e| Self::map_send_error(e, INSERT_TIMEOUT))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
