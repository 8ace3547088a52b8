//! Diagnosis persistence and similarity lookup.
//!
//! The store is an external ranked-match service: it owns the fuzzy
//! search (a stored procedure returning candidates most-similar first)
//! and the submissions table. This module only defines the contract and
//! the HTTP adapter; acceptance rules for candidates live in
//! [`crate::diagnosis::cache`].

pub mod supabase;

pub use supabase::SupabaseStore;

use crate::diagnosis::record::DiagnosisRecord;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors from store operations. Callers treat every variant as
/// degradable: a failed search is a cache miss, a failed insert is
/// logged and dropped.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Store error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Parameters for a similarity search.
#[derive(Debug, Clone)]
pub struct SimilarityQuery {
    pub appliance: String,
    pub brand: String,
    pub problem: String,
    pub error_code: Option<String>,
    /// Lower bound passed to the search; the cache adapter applies its
    /// own stricter acceptance bar on top.
    pub threshold: f32,
}

/// A ranked candidate returned by the similarity search.
///
/// Every field except the score is optional: rows written by older
/// versions of the pipeline may be sparse, and the acceptance rules
/// decide whether a candidate is complete enough to reuse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CachedRecord {
    pub appliance_type: Option<String>,
    pub brand: Option<String>,
    pub error_code: Option<String>,
    pub error_code_meaning: Option<String>,
    pub possible_causes: Option<Vec<String>>,
    pub diy_recommendations: Option<Vec<String>>,
    pub professional_recommendations: Option<Vec<String>>,
    pub priority_level: Option<String>,
    pub estimated_cost: Option<String>,
    pub difficulty_level: Option<String>,
    pub recommended_action: Option<String>,
    pub service_reason: Option<String>,
    pub skills_required: Option<Vec<String>>,
    pub estimated_time: Option<String>,
    pub safety_warnings: Option<Vec<String>>,
    pub similarity_score: f32,
    pub occurrence_count: Option<u32>,
}

/// Unified interface to the diagnosis store.
///
/// Object-safe; the engine holds it as `Arc<dyn DiagnosisStore>` so tests
/// can substitute canned candidates without HTTP.
#[async_trait]
pub trait DiagnosisStore: Send + Sync + 'static {
    /// Run the fuzzy search. Candidates arrive pre-sorted by similarity,
    /// descending.
    async fn search_similar(
        &self,
        query: &SimilarityQuery,
    ) -> Result<Vec<CachedRecord>, StoreError>;

    /// Record one diagnosis attempt. Fire-and-forget from the caller's
    /// perspective.
    async fn insert(&self, record: &DiagnosisRecord) -> Result<(), StoreError>;
}
