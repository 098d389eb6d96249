use crate::output::print_json;
use anyhow::Context;
use signal_core::scenario::{Scenario, WarnLevel};
use std::path::Path;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let scenario = Scenario::load(path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    let warnings = scenario.validate();

    if json {
        print_json(&serde_json::json!({
            "steps": scenario.steps.len(),
            "warnings": warnings,
        }))?;
    } else if warnings.is_empty() {
        println!("Scenario is valid. {} step(s), no warnings.", scenario.steps.len());
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("scenario validation found errors");
    }

    Ok(())
}
