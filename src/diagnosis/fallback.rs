//! Static fallback diagnosis.
//!
//! The last tier of the pipeline: when the cache misses and the LLM is
//! unavailable or fails, the caller still gets a conservative,
//! safety-biased result. Always recommends a professional visit.

use crate::diagnosis::defaults::{
    DEFAULT_CAUSES, DEFAULT_DIY_STEPS, DEFAULT_PROFESSIONAL_SKILLS, DEFAULT_PROFESSIONAL_STEPS,
    DEFAULT_SAFETY_WARNINGS, HAZARD_SAFETY_WARNINGS,
};
use crate::diagnosis::types::{
    Difficulty, DiagnosisResult, Recommendations, ServiceType, Urgency,
};

/// Problem-text keywords that mark an immediate electrical hazard.
const HAZARD_KEYWORDS: &[&str] = &["smoke", "sparking", "burning"];

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Build the static fallback result for a request.
///
/// Pure: same inputs, same output. Hazard keywords in the problem text
/// raise the urgency and swap in the immediate-hazard warning set.
pub fn fallback_diagnosis(appliance: &str, brand: &str, problem: &str) -> DiagnosisResult {
    let lower = problem.to_lowercase();
    let hazardous = HAZARD_KEYWORDS.iter().any(|k| lower.contains(k));

    let (urgency, safety_warnings) = if hazardous {
        (Urgency::High, to_owned_list(HAZARD_SAFETY_WARNINGS))
    } else {
        (Urgency::Medium, to_owned_list(DEFAULT_SAFETY_WARNINGS))
    };

    let service_reason = if brand.is_empty() && appliance.is_empty() {
        "An engineer visit is the safest way to diagnose this fault properly".to_string()
    } else {
        format!(
            "Without a confirmed diagnosis, a qualified engineer is the safest way to get this {} {} repaired",
            brand.trim(),
            appliance.trim()
        )
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
    };

    DiagnosisResult {
        error_code_meaning: None,
        possible_causes: to_owned_list(DEFAULT_CAUSES),
        recommendations: Recommendations {
            diy: to_owned_list(DEFAULT_DIY_STEPS),
            professional: to_owned_list(DEFAULT_PROFESSIONAL_STEPS),
        },
        urgency,
        estimated_cost: "£109-£149".to_string(),
        difficulty: Difficulty::Expert,
        recommended_service: ServiceType::Professional,
        service_reason,
        skills_required: Some(to_owned_list(DEFAULT_PROFESSIONAL_SKILLS)),
        time_estimate: "1-2 hours".to_string(),
        safety_warnings: Some(safety_warnings),
        source_urls: None,
    }
}
