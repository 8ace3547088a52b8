//! Property tests for the error-code detector.
//!
//! The detector is the first pure stage of every request; it must never
//! panic and must stay deterministic whatever arrives in the problem
//! field.

use proptest::prelude::*;
use triage::diagnosis::detect_error_code;

proptest! {
    #[test]
    fn detector_never_panics(input in "\\PC*") {
        let _ = detect_error_code(&input);
    }

    #[test]
    fn detector_is_deterministic(input in "\\PC*") {
        let first = detect_error_code(&input);
        prop_assert_eq!(detect_error_code(&input), first);
    }

    #[test]
    fn detected_codes_are_canonical(input in "\\PC*") {
        if let Some(code) = detect_error_code(&input) {
            prop_assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            prop_assert!(!code.contains(char::is_whitespace));
            prop_assert!(!code.contains('-'));
        }
    }

    #[test]
    fn prefixed_codes_detected(letter in "[a-f]", digits in 1u32..=99) {
        let code = format!("{letter}{digits}");
        let input = format!("the display shows error code {code} constantly");
        prop_assert_eq!(detect_error_code(&input), Some(code.to_uppercase()));
    }

    // The reversed form is a fixed heuristic: digits then a trailing E or
    // F rotate to letter-first. Deliberately not generalized further.
    #[test]
    fn reversed_codes_rotate(digits in 1u32..=99, letter in "[ef]") {
        let input = format!("panel reads {digits}{letter} and stops");
        let expected = format!("{}{digits}", letter.to_uppercase());
        prop_assert_eq!(detect_error_code(&input), Some(expected));
    }
}

#[test]
fn known_forms_canonicalize() {
    for (input, expected) in [
        ("E13", Some("E13")),
        ("error code E13", Some("E13")),
        ("13E", Some("E13")),
        ("F-05", Some("F05")),
        ("LE1", Some("LE1")),
        ("no code in this text at all", None),
    ] {
        assert_eq!(
            detect_error_code(input).as_deref(),
            expected,
            "input: {input}"
        );
    }
}
