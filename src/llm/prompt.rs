//! Diagnosis prompt construction.
//!
//! One structured prompt per request. The headings requested here are
//! the same ones the parser's lookup table recognizes; change them
//! together.

use crate::search::Enrichment;
use std::fmt::Write;

/// Build the diagnosis prompt for one request.
pub fn build_diagnosis_prompt(
    appliance: &str,
    brand: &str,
    problem: &str,
    error_code: Option<&str>,
    enrichment: Option<&Enrichment>,
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are an experienced UK domestic appliance engineer. Diagnose the fault below \
         and reply in British English."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Appliance: {appliance}");
    let _ = writeln!(prompt, "Brand: {brand}");
    let _ = writeln!(prompt, "Reported problem: {problem}");
    if let Some(code) = error_code {
        let _ = writeln!(prompt, "Displayed error code: {code}");
    }

    if let Some(enrichment) = enrichment {
        let _ = writeln!(prompt);
        let _ = writeln!(
            prompt,
            "Relevant information found on the web for this error code:"
        );
        let _ = writeln!(prompt, "{}", enrichment.context);
    }

    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Reply using exactly these section headings, nothing else:"
    );
    let _ = writeln!(prompt);
    if error_code.is_some() {
        let _ = writeln!(
            prompt,
            "ERROR CODE MEANING: one sentence explaining what the code means for this appliance"
        );
    }
    let _ = writeln!(prompt, "POSSIBLE CAUSES: numbered list, most likely first, up to 5");
    let _ = writeln!(
        prompt,
        "DIY STEPS: bulleted list of safe checks the owner can do, up to 6"
    );
    let _ = writeln!(
        prompt,
        "PROFESSIONAL STEPS: bulleted list of what an engineer would do, up to 6"
    );
    let _ = writeln!(prompt, "RECOMMENDED SERVICE: one of diy, professional, warranty");
    let _ = writeln!(prompt, "DIFFICULTY: one of easy, moderate, difficult, expert");
    let _ = writeln!(prompt, "URGENCY: one of low, medium, high");
    let _ = writeln!(prompt, "TIME ESTIMATE: expected repair duration");
    let _ = writeln!(
        prompt,
        "ESTIMATED COST: repair cost range in pounds sterling, e.g. £109-£149"
    );
    let _ = writeln!(prompt, "SKILLS REQUIRED: comma-separated, up to 4");
    let _ = writeln!(prompt, "SAFETY WARNINGS: bulleted list, up to 4");
    let _ = writeln!(
        prompt,
        "SERVICE REASON: one or two sentences explaining the service recommendation"
    );

    prompt
}
