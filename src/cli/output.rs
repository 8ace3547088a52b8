//! Output formatting helpers for CLI commands

use crate::diagnosis::{DiagnosisResult, Urgency};
use colored::Colorize;

/// Format a diagnosis for terminal display.
pub fn format_diagnosis(result: &DiagnosisResult) -> String {
    let mut out = String::new();

    if let Some(meaning) = &result.error_code_meaning {
        out.push_str(&format!("{}\n{}\n\n", "Error code".bold(), meaning));
    }

    out.push_str(&format!("{}\n", "Possible causes".bold()));
    for cause in &result.possible_causes {
        out.push_str(&format!("  • {}\n", cause));
    }

    out.push_str(&format!("\n{}\n", "Try yourself".bold()));
    for step in &result.recommendations.diy {
        out.push_str(&format!("  • {}\n", step));
    }

    out.push_str(&format!("\n{}\n", "What an engineer would do".bold()));
    for step in &result.recommendations.professional {
        out.push_str(&format!("  • {}\n", step));
    }

    let urgency = match result.urgency {
        Urgency::High => "high".red().to_string(),
        Urgency::Medium => "medium".yellow().to_string(),
        Urgency::Low => "low".green().to_string(),
    };

    out.push_str(&format!(
        "\n{}: {}   {}: {}   {}: {}\n",
        "Recommended".bold(),
        result.recommended_service.as_str(),
        "Urgency".bold(),
        urgency,
        "Difficulty".bold(),
        result.difficulty.as_str(),
    ));
    out.push_str(&format!(
        "{}: {}   {}: {}\n",
        "Estimated cost".bold(),
        result.estimated_cost,
        "Time".bold(),
        result.time_estimate,
    ));

    out.push_str(&format!("\n{}\n", result.service_reason.italic()));

    if let Some(warnings) = &result.safety_warnings {
        out.push_str(&format!("\n{}\n", "Safety".bold().red()));
        for warning in warnings {
            out.push_str(&format!("  ! {}\n", warning));
        }
    }

    if let Some(urls) = &result.source_urls {
        out.push_str(&format!("\n{}\n", "Sources".bold()));
        for url in urls {
            out.push_str(&format!("  {}\n", url.underline()));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::fallback_diagnosis;

    #[test]
    fn test_format_includes_all_sections() {
        let result = fallback_diagnosis("oven", "Neff", "oven will not heat up");
        let text = format_diagnosis(&result);

        assert!(text.contains("Possible causes"));
        assert!(text.contains("Try yourself"));
        assert!(text.contains("What an engineer would do"));
        assert!(text.contains("£109-£149"));
        assert!(text.contains("Safety"));
    }

    #[test]
    fn test_format_omits_absent_sections() {
        let mut result = fallback_diagnosis("oven", "Neff", "oven will not heat up");
        result.safety_warnings = None;
        result.source_urls = None;
        let text = format_diagnosis(&result);

        assert!(!text.contains("Sources"));
        assert!(!text.contains("Safety"));
    }
}
