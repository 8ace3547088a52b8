//! Appliance fault error-code detection.
//!
//! Pulls a canonical code such as `E13` out of free-text problem
//! descriptions. Patterns are tried in a fixed priority order: forms with
//! an `error code` prefix win over bare letter-digit forms, which win over
//! the reversed digits-then-letter form. The first pattern that matches
//! anywhere in the text decides the result, which keeps the function
//! deterministic for testing.

use regex::Regex;
use std::sync::LazyLock;

/// Ordered detection patterns, applied to lowercased text.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "error code e13", "error f-05", "code le1", "error 13e"
        r"(?:error\s+code|error|code)\s*[:\-]?\s*([a-z]{1,2}\s*-?\s*\d{1,3}|\d{1,3}\s*-?\s*[ef])\b",
        // hyphenated: "f-13"
        r"\b([a-z]{1,2}\s*-\s*\d{1,3})\b",
        // bare: "e13", "le1"
        r"\b([a-z]{1,2}\d{1,3})\b",
        // reversed: "13e", "05-f"
        r"\b(\d{1,3}\s*-?\s*[ef])\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("error-code pattern must compile"))
    .collect()
});

/// Matches a canonicalized code in the reversed digits-then-letter form.
static REVERSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)([EF])$").expect("reversed pattern must compile"));

/// Extract a canonical fault code from a problem description, or `None`
/// when no recognized form is present.
pub fn detect_error_code(problem: &str) -> Option<String> {
    let text = problem.to_lowercase();

    for pattern in PATTERNS.iter() {
        if let Some(captures) = pattern.captures(&text) {
            let raw = captures.get(1).map(|m| m.as_str())?;
            return Some(canonicalize(raw));
        }
    }

    None
}

/// Strip separators, uppercase, and rotate the reversed form.
///
/// The rotation (`13E` -> `E13`) only fires for codes that are digits
/// followed by a trailing `E` or `F`. That rule is carried over from the
/// manufacturer code schemes observed in production submissions and is
/// deliberately not generalized to other letters.
fn canonicalize(raw: &str) -> String {
    let code: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();

    if let Some(captures) = REVERSED.captures(&code) {
        format!("{}{}", &captures[2], &captures[1])
    } else {
        code
    }
}
