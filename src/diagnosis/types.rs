//! Diagnosis request and result types.
//!
//! `DiagnosisResult` is the canonical output schema for the whole pipeline:
//! every source (cache, LLM, fallback) is normalized into it before it is
//! persisted or returned. Field names serialize in camelCase to match the
//! booking site's API contract.

use serde::{Deserialize, Serialize};

/// Maximum entries kept in `possible_causes`.
pub const MAX_CAUSES: usize = 5;
/// Maximum entries kept in each recommendations list.
pub const MAX_RECOMMENDATIONS: usize = 6;
/// Maximum entries kept in `skills_required`.
pub const MAX_SKILLS: usize = 4;
/// Maximum entries kept in `safety_warnings`.
pub const MAX_SAFETY_WARNINGS: usize = 4;
/// Maximum source URLs surfaced to the end user.
pub const MAX_SOURCE_URLS: usize = 3;

/// An end-user diagnosis request, as received from the booking form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiagnosisRequest {
    pub appliance: String,
    pub brand: String,
    pub problem: String,
    /// Rate-limiting identity and persistence metadata. Delivery of any
    /// follow-up email is handled elsewhere.
    pub email: String,
}

/// How urgently the fault should be looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Classify free text by substring. Anything that is neither clearly
    /// low nor clearly high lands on the default.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("high") {
            Urgency::High
        } else if lower.contains("low") {
            Urgency::Low
        } else {
            Urgency::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

/// How hard the repair is for a competent DIYer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Difficult,
    Expert,
}

impl Difficulty {
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("expert") {
            Difficulty::Expert
        } else if lower.contains("difficult") {
            Difficulty::Difficult
        } else if lower.contains("easy") {
            Difficulty::Easy
        } else {
            Difficulty::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Difficult => "difficult",
            Difficulty::Expert => "expert",
        }
    }
}

/// The recommended path of action for the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Diy,
    Professional,
    Warranty,
}

impl ServiceType {
    /// Classify free text by substring; professional is the safe default.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("diy") {
            ServiceType::Diy
        } else if lower.contains("warranty") {
            ServiceType::Warranty
        } else {
            ServiceType::Professional
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Diy => "diy",
            ServiceType::Professional => "professional",
            ServiceType::Warranty => "warranty",
        }
    }
}

/// DIY and professional repair steps, both always non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub diy: Vec<String>,
    pub professional: Vec<String>,
}

/// The canonical diagnosis output schema.
///
/// Constructed once per request and never mutated afterwards, except for
/// the error-code-consistency cleanup applied to the copy that is
/// persisted (see [`crate::diagnosis::record`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    /// Present only when an error code was detected and explained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code_meaning: Option<String>,
    pub possible_causes: Vec<String>,
    pub recommendations: Recommendations,
    pub urgency: Urgency,
    /// Human-readable currency range, `"£N-£M"` or `"£N"`.
    pub estimated_cost: String,
    pub difficulty: Difficulty,
    pub recommended_service: ServiceType,
    pub service_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_required: Option<Vec<String>>,
    pub time_estimate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_warnings: Option<Vec<String>>,
    /// Present only when web search contributed to the diagnosis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_urls: Option<Vec<String>>,
}

impl DiagnosisResult {
    /// Attach up to [`MAX_SOURCE_URLS`] enrichment source links.
    pub fn with_source_urls(mut self, urls: &[String]) -> Self {
        if !urls.is_empty() {
            self.source_urls = Some(urls.iter().take(MAX_SOURCE_URLS).cloned().collect());
        }
        self
    }
}
