//! Request validation and free-text sanitization.
//!
//! Validation is the first of the two pre-flight gates: it rejects with a
//! typed error before any side effect. Sanitization never fails; it
//! strips markup injection patterns and caps lengths so downstream
//! prompts and persisted rows only ever see plain text.

use crate::diagnosis::error::DiagnoseError;
use crate::diagnosis::types::DiagnosisRequest;
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_APPLIANCE_LEN: usize = 100;
pub const MAX_BRAND_LEN: usize = 100;
pub const MIN_PROBLEM_LEN: usize = 10;
pub const MAX_PROBLEM_LEN: usize = 500;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("script pattern"));

static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*(script|iframe|object|embed)\b[^>]*>|on\w+\s*=|javascript:")
        .expect("markup pattern")
});

/// Trailing noise the parts-search UI appends to appliance names.
static APPLIANCE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(spares?|parts?|accessories)\s*$").expect("noise pattern")
});

/// Validate request fields. Invalid input is rejected before the rate
/// limiter runs and before anything is sanitized or persisted.
pub fn validate(request: &DiagnosisRequest) -> Result<(), DiagnoseError> {
    if !EMAIL.is_match(request.email.trim()) {
        return Err(DiagnoseError::invalid("email", "not a valid email address"));
    }

    let appliance = request.appliance.trim();
    if appliance.is_empty() || appliance.chars().count() > MAX_APPLIANCE_LEN {
        return Err(DiagnoseError::invalid(
            "appliance",
            "must be between 1 and 100 characters",
        ));
    }

    let brand = request.brand.trim();
    if brand.is_empty() || brand.chars().count() > MAX_BRAND_LEN {
        return Err(DiagnoseError::invalid(
            "brand",
            "must be between 1 and 100 characters",
        ));
    }

    let problem_len = request.problem.trim().chars().count();
    if problem_len < MIN_PROBLEM_LEN || problem_len > MAX_PROBLEM_LEN {
        return Err(DiagnoseError::invalid(
            "problem",
            "must be between 10 and 500 characters",
        ));
    }

    Ok(())
}

/// Strip injection patterns and cap length. Always succeeds.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, " ");
    let cleaned = MARKUP.replace_all(&without_scripts, " ");
    let trimmed: String = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    trimmed.chars().take(max_len).collect()
}

/// Normalize an appliance name: sanitize, then strip the trailing
/// "spares/parts/accessories" noise words that arrive from catalogue
/// links.
pub fn normalize_appliance(input: &str) -> String {
    let sanitized = sanitize_text(input, MAX_APPLIANCE_LEN);
    let mut current = sanitized;
    loop {
        let stripped = APPLIANCE_NOISE.replace(&current, "").to_string();
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// A request with every free-text field cleaned, ready for the pipeline.
#[derive(Debug, Clone)]
pub struct SanitizedRequest {
    pub appliance: String,
    pub brand: String,
    pub problem: String,
    /// Lowercased and trimmed; the rate-limiting identity.
    pub email: String,
}

impl SanitizedRequest {
    pub fn from_request(request: &DiagnosisRequest) -> Self {
        Self {
            appliance: normalize_appliance(&request.appliance),
            brand: sanitize_text(&request.brand, MAX_BRAND_LEN),
            problem: sanitize_text(&request.problem, MAX_PROBLEM_LEN),
            email: request.email.trim().to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, appliance: &str, brand: &str, problem: &str) -> DiagnosisRequest {
        DiagnosisRequest {
            appliance: appliance.to_string(),
            brand: brand.to_string(),
            problem: problem.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let req = request(
            "jo@example.co.uk",
            "washing machine",
            "Bosch",
            "drum will not spin at all",
        );
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        for email in ["", "not-an-email", "a@b", "has space@x.com"] {
            let req = request(email, "oven", "Neff", "oven will not heat up");
            let err = validate(&req).unwrap_err();
            assert!(matches!(err, DiagnoseError::InvalidInput { ref field, .. } if field == "email"));
        }
    }

    #[test]
    fn test_validate_rejects_short_and_long_problem() {
        let req = request("a@b.com", "oven", "Neff", "too short");
        assert!(validate(&req).is_err());

        let long = "x".repeat(501);
        let req = request("a@b.com", "oven", "Neff", &long);
        assert!(validate(&req).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_appliance() {
        let req = request("a@b.com", "   ", "Neff", "oven will not heat up");
        let err = validate(&req).unwrap_err();
        assert!(matches!(err, DiagnoseError::InvalidInput { ref field, .. } if field == "appliance"));
    }

    #[test]
    fn test_sanitize_strips_script_blocks() {
        let dirty = "broken <script>alert('x')</script> drum";
        assert_eq!(sanitize_text(dirty, 100), "broken drum");
    }

    #[test]
    fn test_sanitize_strips_handlers_and_iframes() {
        let dirty = r#"<iframe src="evil"> door onclick=steal() javascript:run()"#;
        let clean = sanitize_text(dirty, 100);
        assert!(!clean.contains("<iframe"));
        assert!(!clean.contains("onclick="));
        assert!(!clean.contains("javascript:"));
        assert!(clean.contains("door"));
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "a".repeat(600);
        assert_eq!(sanitize_text(&long, 500).chars().count(), 500);
    }

    #[test]
    fn test_normalize_appliance_strips_noise_words() {
        assert_eq!(normalize_appliance("washing machine spares"), "washing machine");
        assert_eq!(normalize_appliance("dishwasher parts"), "dishwasher");
        assert_eq!(
            normalize_appliance("tumble dryer spares accessories"),
            "tumble dryer"
        );
        assert_eq!(normalize_appliance("oven"), "oven");
    }

    #[test]
    fn test_sanitized_request_lowercases_email() {
        let req = request(
            "  Jo@Example.COM ",
            "oven",
            "Neff",
            "oven will not heat up",
        );
        let sanitized = SanitizedRequest::from_request(&req);
        assert_eq!(sanitized.email, "jo@example.com");
    }
}
