//! LLM reply parsing and normalization.
//!
//! Converts the model's semi-structured text into a strict
//! [`DiagnosisResult`]. Extraction is heading-delimited: the recognized
//! section headings and their synonyms live in one lookup table so the
//! rules can be unit-tested against literal reply fixtures. Every field
//! has a default; parsing never fails, whatever the model returned.

use crate::diagnosis::defaults::{
    default_skills, or_default, DEFAULT_CAUSES, DEFAULT_DIY_STEPS, DEFAULT_PROFESSIONAL_STEPS,
    DEFAULT_SAFETY_WARNINGS,
};
use crate::diagnosis::types::{
    Difficulty, DiagnosisResult, Recommendations, ServiceType, Urgency, MAX_CAUSES,
    MAX_RECOMMENDATIONS, MAX_SAFETY_WARNINGS, MAX_SKILLS,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// List entries shorter than this are discarded as noise.
const MIN_LIST_ENTRY_LEN: usize = 10;
/// List entries longer than this are discarded as run-ons.
const MAX_LIST_ENTRY_LEN: usize = 200;
/// Service reasons shorter than this are replaced with generated text.
const MIN_REASON_LEN: usize = 20;

/// The professional call-out band. Parsed costs are clamped into it.
const PROFESSIONAL_COST_MIN: u32 = 80;
const PROFESSIONAL_COST_MAX: u32 = 149;

const DEFAULT_PROFESSIONAL_COST: &str = "£109-£149";
const DEFAULT_DIY_COST: &str = "£0-£50";
const DEFAULT_TIME_ESTIMATE: &str = "1-2 hours";
const DIY_TIME_ESTIMATE: &str = "30-60 minutes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    ErrorCodeMeaning,
    Causes,
    DiySteps,
    ProfessionalSteps,
    ServiceType,
    Difficulty,
    Urgency,
    TimeEstimate,
    Cost,
    Skills,
    Safety,
    ServiceReason,
}

/// Recognized headings, longest synonym first within each section.
///
/// This table is the contract with the prompt in [`crate::llm::prompt`]:
/// new reply formats are handled by extending it, not by scattering
/// string literals through the extraction code.
const HEADINGS: &[(Section, &[&str])] = &[
    (
        Section::ErrorCodeMeaning,
        &["ERROR CODE MEANING", "ERROR MEANING", "CODE MEANING"],
    ),
    (
        Section::Causes,
        &["POSSIBLE CAUSES", "LIKELY CAUSES", "CAUSES"],
    ),
    (
        Section::DiySteps,
        &["DIY RECOMMENDATIONS", "DIY STEPS", "DIY FIXES", "DIY"],
    ),
    (
        Section::ProfessionalSteps,
        &[
            "PROFESSIONAL RECOMMENDATIONS",
            "PROFESSIONAL STEPS",
            "PROFESSIONAL REPAIR",
            "PROFESSIONAL",
        ],
    ),
    (
        Section::ServiceType,
        &["RECOMMENDED SERVICE", "SERVICE RECOMMENDATION", "SERVICE TYPE"],
    ),
    (Section::Difficulty, &["DIFFICULTY LEVEL", "DIFFICULTY"]),
    (Section::Urgency, &["URGENCY LEVEL", "URGENCY"]),
    (
        Section::TimeEstimate,
        &["TIME ESTIMATE", "ESTIMATED TIME", "REPAIR TIME"],
    ),
    (Section::Cost, &["ESTIMATED COST", "COST ESTIMATE", "COST"]),
    (Section::Skills, &["SKILLS REQUIRED", "SKILLS NEEDED", "SKILLS"]),
    (Section::Safety, &["SAFETY WARNINGS", "SAFETY NOTES", "SAFETY"]),
    (
        Section::ServiceReason,
        &["SERVICE REASON", "REASON FOR RECOMMENDATION", "REASON"],
    ),
];

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]+|\d+[.)])\s*").expect("list marker pattern"));

static CURRENCY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"£\s*(\d+)(?:\s*-\s*£?\s*(\d+))?").expect("currency pattern")
});

static DIY_COST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)diy[^£]*£\s*(\d+)(?:\s*-\s*£?\s*(\d+))?").expect("diy cost pattern")
});

static ZERO_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"£\s*0\s*-\s*£?\s*(\d+)").expect("zero range pattern"));

/// Context the parser needs beyond the raw text.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub appliance: &'a str,
    pub brand: &'a str,
    pub error_code: Option<&'a str>,
}

/// One extracted section: text on the heading line plus the lines below
/// it, up to the next heading.
#[derive(Debug, Default)]
struct Span {
    inline: String,
    lines: Vec<String>,
}

impl Span {
    fn scalar(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.inline.is_empty() {
            parts.push(&self.inline);
        }
        parts.extend(self.lines.iter().map(String::as_str));
        parts
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn list(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
            .filter(|entry| {
                let len = entry.chars().count();
                len > MIN_LIST_ENTRY_LEN && len < MAX_LIST_ENTRY_LEN
            })
            .collect()
    }
}

/// A heading is a line that starts (after bullet/markdown decoration)
/// with a known synonym, followed by nothing or by a `:` / `-`
/// separator. Body text that merely begins with a heading word does not
/// qualify.
fn detect_heading(line: &str) -> Option<(Section, String)> {
    let stripped = line
        .trim_start_matches(|c: char| c.is_whitespace() || c == '#' || c == '*' || c == '-')
        .trim();
    if stripped.is_empty() {
        return None;
    }
    let upper = stripped.to_ascii_uppercase();

    for (section, synonyms) in HEADINGS {
        for synonym in *synonyms {
            if !upper.starts_with(synonym) {
                continue;
            }
            // Synonyms are ASCII, so this byte slice is char-safe.
            let rest = stripped[synonym.len()..].trim();
            if !(rest.is_empty() || rest.starts_with(':') || rest.starts_with('-')) {
                continue;
            }
            let inline = rest
                .trim_start_matches([':', '-'])
                .trim()
                .trim_matches('*')
                .trim()
                .to_string();
            return Some((*section, inline));
        }
    }

    None
}

/// Slice the raw reply into per-section spans. The first occurrence of
/// each section wins; every heading line acts as a boundary.
fn extract_sections(raw: &str) -> HashMap<Section, Span> {
    let lines: Vec<&str> = raw.lines().collect();
    let mut sections: HashMap<Section, Span> = HashMap::new();
    let mut current: Option<Section> = None;

    for line in &lines {
        if let Some((section, inline)) = detect_heading(line) {
            if sections.contains_key(&section) {
                // Duplicate heading: still ends the previous section.
                current = None;
            } else {
                sections.insert(section, Span { inline, lines: Vec::new() });
                current = Some(section);
            }
            continue;
        }
        if let Some(section) = current {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                if let Some(span) = sections.get_mut(&section) {
                    span.lines.push(trimmed.to_string());
                }
            }
        }
    }

    sections
}

fn truncate(mut list: Vec<String>, max: usize) -> Vec<String> {
    list.truncate(max);
    list
}

fn clamp_professional_cost(raw: &str) -> String {
    let Some(captures) = CURRENCY_RANGE.captures(raw) else {
        return DEFAULT_PROFESSIONAL_COST.to_string();
    };
    let low: u32 = captures[1].parse().unwrap_or(PROFESSIONAL_COST_MIN);
    let high: u32 = captures
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(PROFESSIONAL_COST_MAX);

    let low = low.clamp(PROFESSIONAL_COST_MIN, PROFESSIONAL_COST_MAX);
    let high = high.clamp(low, PROFESSIONAL_COST_MAX);

    if low == high {
        format!("£{low}")
    } else {
        format!("£{low}-£{high}")
    }
}

fn extract_diy_cost(raw: &str) -> String {
    if let Some(captures) = DIY_COST.captures(raw) {
        let low = &captures[1];
        return match captures.get(2) {
            Some(high) => format!("£{low}-£{}", high.as_str()),
            None => format!("£{low}"),
        };
    }
    if let Some(captures) = ZERO_RANGE.captures(raw) {
        return format!("£0-£{}", &captures[1]);
    }
    DEFAULT_DIY_COST.to_string()
}

fn generated_reason(service: ServiceType, brand: &str, appliance: &str) -> String {
    let reason = match service {
        ServiceType::Diy => format!(
            "This {brand} {appliance} fault can usually be put right with the checks above before paying for an engineer"
        ),
        ServiceType::Warranty => format!(
            "Faults like this on a {brand} {appliance} are normally covered by the manufacturer's warranty, so contact them before booking a paid repair"
        ),
        ServiceType::Professional => format!(
            "Diagnosing this {brand} {appliance} fault safely needs an engineer's test equipment and access to approved parts"
        ),
    };
    reason.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a raw LLM reply into the strict result schema.
///
/// Pure and total: adversarial or empty input yields a structurally valid
/// result built from defaults.
pub fn parse_diagnosis(raw: &str, ctx: &ParseContext<'_>) -> DiagnosisResult {
    let sections = extract_sections(raw);
    let scalar = |section: Section| {
        sections
            .get(&section)
            .map(Span::scalar)
            .unwrap_or_default()
    };
    let list = |section: Section| sections.get(&section).map(Span::list).unwrap_or_default();

    let service = ServiceType::classify(&scalar(Section::ServiceType));
    let difficulty = Difficulty::classify(&scalar(Section::Difficulty));
    let urgency = Urgency::classify(&scalar(Section::Urgency));

    let error_code_meaning = match ctx.error_code {
        Some(_) => {
            let meaning = scalar(Section::ErrorCodeMeaning);
            if meaning.is_empty() || meaning.to_uppercase().contains("N/A") {
                None
            } else {
                Some(meaning)
            }
        }
        None => None,
    };

    let time_text = scalar(Section::TimeEstimate);
    let time_estimate = if service == ServiceType::Diy && !time_text.contains("minutes") {
        DIY_TIME_ESTIMATE.to_string()
    } else if time_text.is_empty() {
        DEFAULT_TIME_ESTIMATE.to_string()
    } else {
        time_text
    };

    let cost_text = scalar(Section::Cost);
    let estimated_cost = if service == ServiceType::Diy {
        extract_diy_cost(&cost_text)
    } else {
        clamp_professional_cost(&cost_text)
    };

    let skills: Vec<String> = scalar(Section::Skills)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let skills_required = if skills.is_empty() {
        default_skills(service)
    } else {
        skills
    };

    let reason_text = scalar(Section::ServiceReason);
    let service_reason = if reason_text.chars().count() >= MIN_REASON_LEN {
        reason_text
    } else {
        generated_reason(service, ctx.brand, ctx.appliance)
    };

    DiagnosisResult {
        error_code_meaning,
        possible_causes: truncate(
            or_default(list(Section::Causes), DEFAULT_CAUSES),
            MAX_CAUSES,
        ),
        recommendations: Recommendations {
            diy: truncate(
                or_default(list(Section::DiySteps), DEFAULT_DIY_STEPS),
                MAX_RECOMMENDATIONS,
            ),
            professional: truncate(
                or_default(list(Section::ProfessionalSteps), DEFAULT_PROFESSIONAL_STEPS),
                MAX_RECOMMENDATIONS,
            ),
        },
        urgency,
        estimated_cost,
        difficulty,
        recommended_service: service,
        service_reason,
        skills_required: Some(truncate(skills_required, MAX_SKILLS)),
        time_estimate,
        safety_warnings: Some(truncate(
            or_default(list(Section::Safety), DEFAULT_SAFETY_WARNINGS),
            MAX_SAFETY_WARNINGS,
        )),
        source_urls: None,
    }
}
