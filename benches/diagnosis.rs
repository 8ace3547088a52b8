//! Benchmarks for the pure hot paths: error-code detection and LLM
//! reply parsing. Both run on every request that reaches their stage.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use triage::diagnosis::{detect_error_code, parse_diagnosis, ParseContext};

const PROBLEM_WITH_CODE: &str =
    "The washing machine stops mid cycle and the display shows error code E13 before draining";
const PROBLEM_WITHOUT_CODE: &str =
    "The drum turns but the clothes come out soaking wet and there is a rattling noise";

const LLM_REPLY: &str = "\
ERROR CODE MEANING: E13 indicates a drainage fault on Bosch washing machines.

POSSIBLE CAUSES:
1. Blocked drain pump filter trapping lint and debris
2. Kinked or obstructed drain hose behind the machine
3. Failed drain pump motor no longer clearing water

DIY STEPS:
- Unplug the machine and open the pump filter flap to clear debris
- Check the drain hose for kinks and straighten it out
- Run a short empty cycle to confirm the water now drains

PROFESSIONAL STEPS:
- Test the drain pump motor windings for continuity
- Replace the drain pump assembly with an approved part

RECOMMENDED SERVICE: professional
DIFFICULTY: moderate
URGENCY: medium
TIME ESTIMATE: 1-2 hours
ESTIMATED COST: £95-£135
SKILLS REQUIRED: multimeter use, pump replacement
SAFETY WARNINGS:
- Disconnect the appliance from the mains before opening the filter

SERVICE REASON: Drainage faults usually need the pump tested under load.";

fn bench_error_code_detection(c: &mut Criterion) {
    c.bench_function("detect_error_code/with_code", |b| {
        b.iter(|| detect_error_code(black_box(PROBLEM_WITH_CODE)))
    });
    c.bench_function("detect_error_code/without_code", |b| {
        b.iter(|| detect_error_code(black_box(PROBLEM_WITHOUT_CODE)))
    });
}

fn bench_reply_parsing(c: &mut Criterion) {
    let ctx = ParseContext {
        appliance: "washing machine",
        brand: "Bosch",
        error_code: Some("E13"),
    };
    c.bench_function("parse_diagnosis/full_reply", |b| {
        b.iter(|| parse_diagnosis(black_box(LLM_REPLY), &ctx))
    });
    c.bench_function("parse_diagnosis/garbage", |b| {
        b.iter(|| parse_diagnosis(black_box("no headings at all here"), &ctx))
    });
}

criterion_group!(benches, bench_error_code_detection, bench_reply_parsing);
criterion_main!(benches);
