//! Default filler text used whenever a source (cached record, LLM reply)
//! leaves a required list empty or malformed.
//!
//! The non-empty-array invariant on `DiagnosisResult` is enforced with
//! these lists rather than by rejecting the source outright: an imperfect
//! diagnosis still beats no diagnosis.

use crate::diagnosis::types::ServiceType;

pub const DEFAULT_CAUSES: &[&str] = &[
    "Component wear or failure consistent with the reported symptoms",
    "A blockage or restriction stopping normal operation",
    "An intermittent electrical connection or sensor fault",
];

pub const DEFAULT_DIY_STEPS: &[&str] = &[
    "Switch the appliance off at the mains for ten minutes, then try again",
    "Check the door is fully closed and any filters are clean",
    "Make sure the appliance is level and no hoses or vents are kinked",
];

pub const DEFAULT_PROFESSIONAL_STEPS: &[&str] = &[
    "Full diagnostic inspection with a manufacturer fault-code readout",
    "Testing and replacement of the faulty component with approved parts",
    "Post-repair safety and performance checks",
];

pub const DEFAULT_SAFETY_WARNINGS: &[&str] = &[
    "Unplug the appliance before any inspection",
    "Never bypass safety interlocks or remove covers while powered",
];

pub const DEFAULT_DIY_SKILLS: &[&str] = &["Basic hand tools", "Following a repair guide"];

pub const DEFAULT_PROFESSIONAL_SKILLS: &[&str] = &["Qualified appliance engineer"];

/// Immediate-hazard warnings used by the fallback generator when the
/// problem text mentions smoke, sparking or burning.
pub const HAZARD_SAFETY_WARNINGS: &[&str] = &[
    "Stop using the appliance immediately",
    "Disconnect it from the mains at the socket or fuse board",
    "Do not reconnect it until it has been inspected by an engineer",
];

/// Return `list` unless it is empty, in which case substitute `defaults`.
pub fn or_default(list: Vec<String>, defaults: &[&str]) -> Vec<String> {
    if list.is_empty() {
        defaults.iter().map(|s| (*s).to_string()).collect()
    } else {
        list
    }
}

/// Skills defaults branch on the recommended service: a DIY suggestion
/// should not claim an engineer is required.
pub fn default_skills(service: ServiceType) -> Vec<String> {
    let skills = match service {
        ServiceType::Diy => DEFAULT_DIY_SKILLS,
        _ => DEFAULT_PROFESSIONAL_SKILLS,
    };
    skills.iter().map(|s| (*s).to_string()).collect()
}
