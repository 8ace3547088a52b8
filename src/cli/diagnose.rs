//! One-shot diagnose command.

use crate::cli::{output, DiagnoseArgs};
use crate::config::TriageConfig;
use crate::diagnosis::{DiagnosisEngine, DiagnosisRequest};

/// Handle `triage diagnose` - run the full pipeline once and print the
/// result.
pub async fn run_diagnose(args: DiagnoseArgs) -> anyhow::Result<()> {
    let config = if args.config.exists() {
        TriageConfig::load(Some(&args.config))?
    } else {
        TriageConfig::default()
    }
    .with_env_overrides();
    config.validate()?;

    let engine = DiagnosisEngine::from_config(&config);

    let request = DiagnosisRequest {
        appliance: args.appliance,
        brand: args.brand,
        problem: args.problem,
        email: args.email,
    };

    let result = engine.diagnose(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", output::format_diagnosis(&result));
    }

    Ok(())
}
