//! Persisted diagnosis rows.
//!
//! Every diagnosis attempt is written back to the store so future
//! requests can be answered from cache and the operations team can audit
//! outcomes. Before the write, an error-code-consistency filter removes
//! stale error-code language from requests where no code was detected.
//! Otherwise a cached E13 explanation could resurface on an unrelated
//! "won't spin" fault.

use crate::diagnosis::sanitize::SanitizedRequest;
use crate::diagnosis::types::DiagnosisResult;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use uuid::Uuid;

/// Confidence recorded for cache-derived results.
const CACHED_CONFIDENCE: f32 = 0.9;
/// Confidence recorded for freshly generated results.
const FRESH_CONFIDENCE: f32 = 1.0;

static BARE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z]{1,2}-?\d{1,3}\b|\b\d{1,3}-?[ef]\b").expect("bare code pattern")
});

/// One row in the submissions table.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisRecord {
    pub id: Uuid,
    pub email: String,
    pub appliance_type: String,
    pub brand: String,
    pub problem_description: String,
    pub error_code: Option<String>,
    pub error_code_meaning: Option<String>,
    pub possible_causes: Vec<String>,
    pub diy_recommendations: Vec<String>,
    pub professional_recommendations: Vec<String>,
    pub priority_level: String,
    pub estimated_cost: String,
    pub difficulty_level: String,
    pub recommended_action: String,
    pub service_reason: String,
    pub skills_required: Vec<String>,
    pub estimated_time: String,
    pub safety_warnings: Vec<String>,
    pub source_urls: Vec<String>,
    pub was_cached: bool,
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
}

fn mentions_error_code(entry: &str) -> bool {
    entry.to_lowercase().contains("error code") || BARE_CODE.is_match(entry)
}

/// Drop entries that talk about an error code, refilling with a
/// placeholder if that empties the list.
fn filter_code_mentions(entries: Vec<String>, placeholder: &str) -> Vec<String> {
    let kept: Vec<String> = entries
        .into_iter()
        .filter(|entry| !mentions_error_code(entry))
        .collect();
    if kept.is_empty() {
        vec![placeholder.to_string()]
    } else {
        kept
    }
}

impl DiagnosisRecord {
    /// Build the row to persist for one diagnosis attempt.
    ///
    /// When no error code was detected, the consistency filter strips the
    /// code meaning and any list entries that mention a code; required
    /// arrays are refilled with a generic placeholder so the row always
    /// satisfies the non-empty invariant.
    pub fn from_result(
        request: &SanitizedRequest,
        result: &DiagnosisResult,
        error_code: Option<&str>,
        was_cached: bool,
    ) -> Self {
        let has_code = error_code.is_some();

        let (meaning, causes, diy, professional) = if has_code {
            (
                result.error_code_meaning.clone(),
                result.possible_causes.clone(),
                result.recommendations.diy.clone(),
                result.recommendations.professional.clone(),
            )
        } else {
            (
                None,
                filter_code_mentions(
                    result.possible_causes.clone(),
                    "General fault requiring inspection",
                ),
                filter_code_mentions(
                    result.recommendations.diy.clone(),
                    "Basic checks before booking a repair",
                ),
                filter_code_mentions(
                    result.recommendations.professional.clone(),
                    "Professional diagnostic inspection",
                ),
            )
        };

        Self {
            id: Uuid::new_v4(),
            email: request.email.clone(),
            appliance_type: request.appliance.clone(),
            brand: request.brand.clone(),
            problem_description: request.problem.clone(),
            error_code: error_code.map(|c| c.to_string()),
            error_code_meaning: meaning,
            possible_causes: causes,
            diy_recommendations: diy,
            professional_recommendations: professional,
            priority_level: result.urgency.as_str().to_string(),
            estimated_cost: result.estimated_cost.clone(),
            difficulty_level: result.difficulty.as_str().to_string(),
            recommended_action: result.recommended_service.as_str().to_string(),
            service_reason: result.service_reason.clone(),
            skills_required: result.skills_required.clone().unwrap_or_default(),
            estimated_time: result.time_estimate.clone(),
            safety_warnings: result.safety_warnings.clone().unwrap_or_default(),
            source_urls: result.source_urls.clone().unwrap_or_default(),
            was_cached,
            confidence: if was_cached {
                CACHED_CONFIDENCE
            } else {
                FRESH_CONFIDENCE
            },
            created_at: Utc::now(),
        }
    }
}
