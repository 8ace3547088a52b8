//! Cached-diagnosis lookup.
//!
//! Queries the store's similarity search and decides whether the top
//! candidate is trustworthy enough to reuse. The rules are strict on
//! purpose: a wrong-but-plausible cached diagnosis is worse than paying
//! for a fresh one.

use crate::diagnosis::defaults::{
    default_skills, or_default, DEFAULT_CAUSES, DEFAULT_DIY_STEPS, DEFAULT_PROFESSIONAL_STEPS,
};
use crate::diagnosis::types::{
    Difficulty, DiagnosisResult, Recommendations, ServiceType, Urgency, MAX_CAUSES,
    MAX_RECOMMENDATIONS, MAX_SAFETY_WARNINGS, MAX_SKILLS,
};
use crate::store::{CachedRecord, DiagnosisStore, SimilarityQuery};
use tracing::{debug, info, warn};

/// Similarity floor passed to the store's search.
pub const SEARCH_THRESHOLD: f32 = 0.5;

/// Stricter bar applied to candidates when the query has no error code.
pub const NO_CODE_ACCEPT_THRESHOLD: f32 = 0.7;

/// Outcome of a cache lookup. Store failures are misses, never errors.
#[derive(Debug)]
pub enum CacheOutcome {
    Hit(Box<DiagnosisResult>),
    Miss,
}

/// Look up a previously computed diagnosis for this request.
pub async fn lookup(
    store: &dyn DiagnosisStore,
    appliance: &str,
    brand: &str,
    problem: &str,
    error_code: Option<&str>,
) -> CacheOutcome {
    let query = SimilarityQuery {
        appliance: appliance.to_string(),
        brand: brand.to_string(),
        problem: problem.to_string(),
        error_code: error_code.map(|c| c.to_string()),
        threshold: SEARCH_THRESHOLD,
    };

    let candidates = match store.search_similar(&query).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!(error = %e, "Similarity search failed; treating as cache miss");
            return CacheOutcome::Miss;
        }
    };

    // Candidates are pre-sorted most-similar first; only the top one is
    // ever considered.
    let Some(candidate) = candidates.into_iter().next() else {
        debug!("No similar diagnoses found");
        return CacheOutcome::Miss;
    };

    if !accept(&candidate, error_code) {
        return CacheOutcome::Miss;
    }

    info!(
        similarity = candidate.similarity_score,
        error_code = error_code.unwrap_or("none"),
        "Cache hit"
    );
    CacheOutcome::Hit(Box::new(map_candidate(candidate, error_code)))
}

fn non_empty(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// The acceptance rule.
///
/// A candidate is reusable only when it is complete (all scalar repair
/// fields populated) and its identity matches: with a detected error
/// code, the candidate's code must equal it exactly; code identity
/// overrides any similarity score. Without a code, the similarity must
/// clear the stricter no-code bar.
fn accept(candidate: &CachedRecord, error_code: Option<&str>) -> bool {
    let complete = non_empty(&candidate.priority_level)
        && non_empty(&candidate.estimated_cost)
        && non_empty(&candidate.difficulty_level)
        && non_empty(&candidate.recommended_action)
        && non_empty(&candidate.estimated_time);
    if !complete {
        debug!("Top candidate rejected: incomplete record");
        return false;
    }

    match error_code {
        Some(code) => {
            let matches = candidate.error_code.as_deref() == Some(code);
            if !matches {
                debug!(
                    wanted = code,
                    found = candidate.error_code.as_deref().unwrap_or("none"),
                    similarity = candidate.similarity_score,
                    "Top candidate rejected: error code mismatch"
                );
            }
            matches
        }
        None => {
            let above_bar = candidate.similarity_score >= NO_CODE_ACCEPT_THRESHOLD;
            if !above_bar {
                debug!(
                    similarity = candidate.similarity_score,
                    "Top candidate rejected: below no-code similarity bar"
                );
            }
            above_bar
        }
    }
}

/// Map an accepted candidate into the result schema, substituting
/// category defaults for any empty list field.
fn map_candidate(candidate: CachedRecord, error_code: Option<&str>) -> DiagnosisResult {
    let service =
        ServiceType::classify(candidate.recommended_action.as_deref().unwrap_or_default());
    let urgency = Urgency::classify(candidate.priority_level.as_deref().unwrap_or_default());
    let difficulty =
        Difficulty::classify(candidate.difficulty_level.as_deref().unwrap_or_default());

    let error_code_meaning = match error_code {
        Some(_) => candidate
            .error_code_meaning
            .filter(|meaning| !meaning.trim().is_empty()),
        None => None,
    };

    let mut skills = candidate.skills_required.unwrap_or_default();
    if skills.is_empty() {
        skills = default_skills(service);
    }
    skills.truncate(MAX_SKILLS);

    let service_reason = candidate
        .service_reason
        .filter(|reason| reason.trim().chars().count() >= 20)
        .unwrap_or_else(|| match service {
            ServiceType::Diy => {
                "Previous identical faults were resolved with the DIY checks listed".to_string()
            }
            _ => "Previous identical faults needed an engineer to resolve safely".to_string(),
        });

    let mut possible_causes =
        or_default(candidate.possible_causes.unwrap_or_default(), DEFAULT_CAUSES);
    possible_causes.truncate(MAX_CAUSES);
    let mut diy = or_default(
        candidate.diy_recommendations.unwrap_or_default(),
        DEFAULT_DIY_STEPS,
    );
    diy.truncate(MAX_RECOMMENDATIONS);
    let mut professional = or_default(
        candidate.professional_recommendations.unwrap_or_default(),
        DEFAULT_PROFESSIONAL_STEPS,
    );
    professional.truncate(MAX_RECOMMENDATIONS);

    DiagnosisResult {
        error_code_meaning,
        possible_causes,
        recommendations: Recommendations { diy, professional },
        urgency,
        estimated_cost: candidate.estimated_cost.unwrap_or_default(),
        difficulty,
        recommended_service: service,
        service_reason,
        skills_required: Some(skills),
        time_estimate: candidate.estimated_time.unwrap_or_default(),
        safety_warnings: candidate.safety_warnings.filter(|w| !w.is_empty()).map(
            |mut warnings| {
                warnings.truncate(MAX_SAFETY_WARNINGS);
                warnings
            },
        ),
        source_urls: None,
    }
}
