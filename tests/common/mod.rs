//! Shared test utilities for triage integration tests.
//!
//! Provides reusable builders for requests, cached candidates, stub
//! stores, and engines to reduce duplication across test files.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use triage::diagnosis::{DiagnosisEngine, DiagnosisRecord, DiagnosisRequest};
use triage::ratelimit::RateLimiter;
use triage::store::{CachedRecord, DiagnosisStore, SimilarityQuery, StoreError};

/// A reply in the exact format the prompt requests.
pub const LLM_REPLY: &str = "\
ERROR CODE MEANING: E13 indicates a drainage fault on Bosch washing machines.

POSSIBLE CAUSES:
1. Blocked drain pump filter trapping lint and debris
2. Kinked or obstructed drain hose behind the machine

DIY STEPS:
- Unplug the machine and open the pump filter flap to clear debris
- Check the drain hose for kinks and straighten it out

PROFESSIONAL STEPS:
- Test the drain pump motor windings for continuity
- Replace the drain pump assembly with an approved part

RECOMMENDED SERVICE: professional
DIFFICULTY: moderate
URGENCY: medium
TIME ESTIMATE: 1-2 hours
ESTIMATED COST: £95-£135
SKILLS REQUIRED: multimeter use, pump replacement
SAFETY WARNINGS:
- Disconnect the appliance from the mains before opening the filter

SERVICE REASON: Drainage faults usually need the pump tested under load, which requires an engineer's equipment.";

/// Create a well-formed diagnosis request.
pub fn make_request(problem: &str) -> DiagnosisRequest {
    DiagnosisRequest {
        appliance: "washing machine".to_string(),
        brand: "Bosch".to_string(),
        problem: problem.to_string(),
        email: "jo@example.com".to_string(),
    }
}

/// Create a candidate that passes every acceptance rule at the given
/// similarity (error-code identity permitting).
pub fn complete_candidate(similarity: f32, error_code: Option<&str>) -> CachedRecord {
    CachedRecord {
        appliance_type: Some("washing machine".to_string()),
        brand: Some("Bosch".to_string()),
        error_code: error_code.map(String::from),
        error_code_meaning: error_code.map(|c| format!("{c} indicates a drainage fault")),
        possible_causes: Some(vec!["Blocked drain pump filter".to_string()]),
        diy_recommendations: Some(vec!["Clean the pump filter and retry a cycle".to_string()]),
        professional_recommendations: Some(vec!["Replace the drain pump assembly".to_string()]),
        priority_level: Some("medium".to_string()),
        estimated_cost: Some("£109-£149".to_string()),
        difficulty_level: Some("moderate".to_string()),
        recommended_action: Some("professional".to_string()),
        service_reason: Some("The pump needs testing under load by an engineer".to_string()),
        skills_required: Some(vec!["Pump replacement".to_string()]),
        estimated_time: Some("1-2 hours".to_string()),
        safety_warnings: Some(vec!["Unplug before opening the filter".to_string()]),
        similarity_score: similarity,
        occurrence_count: Some(3),
    }
}

/// In-memory store stub recording every call.
#[derive(Default)]
pub struct StubStore {
    pub candidates: Vec<CachedRecord>,
    pub fail_search: bool,
    pub fail_insert: bool,
    pub searches: AtomicUsize,
    pub inserts: Mutex<Vec<DiagnosisRecord>>,
}

impl StubStore {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_candidates(candidates: Vec<CachedRecord>) -> Arc<Self> {
        Arc::new(Self {
            candidates,
            ..Default::default()
        })
    }
}

#[async_trait]
impl DiagnosisStore for StubStore {
    async fn search_similar(
        &self,
        _query: &SimilarityQuery,
    ) -> Result<Vec<CachedRecord>, StoreError> {
        self.searches
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail_search {
            return Err(StoreError::Network("connection refused".to_string()));
        }
        Ok(self.candidates.clone())
    }

    async fn insert(&self, record: &DiagnosisRecord) -> Result<(), StoreError> {
        if self.fail_insert {
            return Err(StoreError::Upstream {
                status: 500,
                message: "insert failed".to_string(),
            });
        }
        self.inserts
            .lock()
            .expect("inserts lock")
            .push(record.clone());
        Ok(())
    }
}

/// Engine over a stub store with no LLM or search tier, with the given
/// per-identity request cap.
pub fn make_engine(store: Arc<StubStore>, cap: u32) -> Arc<DiagnosisEngine> {
    let limiter = Arc::new(RateLimiter::new(cap, Duration::from_secs(3600)));
    Arc::new(DiagnosisEngine::new(store, None, None, limiter))
}
