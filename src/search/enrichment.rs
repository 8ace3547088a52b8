//! Error-code context gathering.
//!
//! Issues several query variants against the active provider, scores the
//! returned snippets with a weighted heuristic, and condenses the best
//! of them into one text blob the LLM prompt can quote. Individual query
//! failures are logged and skipped; partial results still count.

use super::{OrganicResult, SearchProvider, SearchResults};
use futures::future::join_all;
use tracing::{debug, warn};

/// Snippets concatenated into the context blob.
const MAX_SNIPPETS: usize = 8;
/// Raw result URLs retained (only the top few are ever shown to users).
const MAX_URLS: usize = 15;
/// Organic snippets below this score are discarded.
const MIN_ORGANIC_SCORE: f32 = 2.0;
/// Organic snippets at or below this length are discarded as noise.
const MIN_SNIPPET_LEN: usize = 20;

const ANSWER_BOX_SCORE: f32 = 10.0;
const FEATURED_SNIPPET_SCORE: f32 = 9.0;
const RELATED_QUESTION_SCORE: f32 = 5.0;
/// Extra weight for a combined title+snippet entry that names the code
/// and the word "error".
const COMBINED_BONUS: f32 = 2.0;

/// Appliance nouns used to spot cross-appliance contamination: a snippet
/// about a dishwasher E13 is worse than useless for a washing machine
/// E13. Fixed list; appliance types added to the product later are not
/// penalized until they are added here too.
const APPLIANCE_TYPES: &[&str] = &[
    "washing machine",
    "washer dryer",
    "tumble dryer",
    "dishwasher",
    "fridge freezer",
    "refrigerator",
    "fridge",
    "freezer",
    "oven",
    "cooker",
    "hob",
    "microwave",
    "extractor hood",
];

/// Condensed web context for one error code.
#[derive(Debug, Clone)]
pub struct Enrichment {
    /// Top snippets, blank-line separated, ready to embed in a prompt.
    pub context: String,
    /// Result URLs in encounter order, capped at [`MAX_URLS`].
    pub source_urls: Vec<String>,
}

#[derive(Debug)]
struct ScoredSnippet {
    text: String,
    score: f32,
}

/// The query variants sent for one code. No ordering dependency between
/// them; they are issued concurrently.
fn query_variants(appliance: &str, brand: &str, code: &str) -> Vec<String> {
    vec![
        format!("\"{brand} {appliance} {code} error code\""),
        format!("what does {code} mean on {brand} {appliance}"),
        format!("{brand} {appliance} {code} troubleshooting"),
    ]
}

/// Weighted relevance score for one organic result.
fn score_organic(result: &OrganicResult, appliance: &str, brand: &str, code: &str) -> f32 {
    let snippet = result.snippet.to_lowercase();
    let title = result.title.to_lowercase();
    let appliance = appliance.to_lowercase();
    let brand = brand.to_lowercase();
    let code = code.to_lowercase();

    let mut score = 0.0;

    // Cross-contamination guard: a different named appliance type in
    // either field is a strong negative signal.
    let mentions_other_appliance = APPLIANCE_TYPES.iter().any(|other| {
        let same_family = appliance.contains(other) || other.contains(appliance.as_str());
        !same_family && (snippet.contains(other) || title.contains(other))
    });
    if mentions_other_appliance {
        score -= 5.0;
    }
    if !appliance.is_empty() && (snippet.contains(&appliance) || title.contains(&appliance)) {
        score += 2.0;
    }

    if snippet.contains(&code) {
        score += 3.0;
    }
    if title.contains(&code) {
        score += 2.0;
    }

    if !brand.is_empty() {
        if snippet.contains(&brand) {
            score += 2.0;
        }
        if title.contains(&brand) {
            score += 1.0;
        }
    }

    if snippet.contains("meaning") || snippet.contains("indicates") {
        score += 1.0;
    }
    if snippet.contains("fix") || snippet.contains("solution") {
        score += 1.0;
    }
    if snippet.contains("error") {
        score += 0.5;
    }

    score
}

/// Fold one provider response into the snippet and URL accumulators.
fn collect_results(
    results: &SearchResults,
    appliance: &str,
    brand: &str,
    code: &str,
    snippets: &mut Vec<ScoredSnippet>,
    urls: &mut Vec<String>,
) {
    if let Some(answer) = &results.answer_box {
        snippets.push(ScoredSnippet {
            text: answer.clone(),
            score: ANSWER_BOX_SCORE,
        });
    }
    if let Some(featured) = &results.featured_snippet {
        snippets.push(ScoredSnippet {
            text: featured.clone(),
            score: FEATURED_SNIPPET_SCORE,
        });
    }

    let code_lower = code.to_lowercase();
    for question in &results.related_questions {
        if question.question.to_lowercase().contains(&code_lower) && !question.snippet.is_empty() {
            snippets.push(ScoredSnippet {
                text: question.snippet.clone(),
                score: RELATED_QUESTION_SCORE,
            });
        }
    }

    for result in &results.organic {
        if !result.url.is_empty() && urls.len() < MAX_URLS && !urls.contains(&result.url) {
            urls.push(result.url.clone());
        }

        let score = score_organic(result, appliance, brand, code);
        if score >= MIN_ORGANIC_SCORE && result.snippet.chars().count() > MIN_SNIPPET_LEN {
            snippets.push(ScoredSnippet {
                text: result.snippet.clone(),
                score,
            });

            // A title+snippet combo naming both the code and "error" is
            // the strongest organic signal; add it as its own entry.
            let combined = format!("{}. {}", result.title, result.snippet);
            let combined_lower = combined.to_lowercase();
            if combined_lower.contains(&code_lower) && combined_lower.contains("error") {
                snippets.push(ScoredSnippet {
                    text: combined,
                    score: score + COMBINED_BONUS,
                });
            }
        }
    }
}

/// Gather web context for a detected error code.
///
/// Returns `None` when every query failed or nothing relevant scored
/// high enough.
pub async fn gather_enrichment(
    provider: &dyn SearchProvider,
    appliance: &str,
    brand: &str,
    code: &str,
) -> Option<Enrichment> {
    let queries = query_variants(appliance, brand, code);
    let searches = queries.iter().map(|q| provider.search(q));
    let responses = join_all(searches).await;

    let mut snippets: Vec<ScoredSnippet> = Vec::new();
    let mut urls: Vec<String> = Vec::new();

    for (query, response) in queries.iter().zip(responses) {
        match response {
            Ok(results) => {
                collect_results(&results, appliance, brand, code, &mut snippets, &mut urls);
            }
            Err(e) => {
                warn!(provider = provider.name(), query = %query, error = %e, "Search query failed; skipping");
            }
        }
    }

    if snippets.is_empty() {
        debug!(code, "No usable search snippets gathered");
        return None;
    }

    snippets.sort_by(|a, b| b.score.total_cmp(&a.score));
    let context = snippets
        .iter()
        .take(MAX_SNIPPETS)
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    debug!(
        code,
        snippets = snippets.len(),
        urls = urls.len(),
        "Gathered search enrichment"
    );

    Some(Enrichment {
        context,
        source_urls: urls,
    })
}
