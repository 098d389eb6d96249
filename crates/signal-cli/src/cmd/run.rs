use crate::output::{print_json, print_lights, print_table};
use anyhow::Context;
use signal_core::scenario::{Scenario, ScenarioReport};
use signal_core::TrafficLightRegistry;
use std::path::Path;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let scenario = Scenario::load(path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;

    let mut registry = TrafficLightRegistry::new();
    tracing::info!(steps = scenario.steps.len(), "running scenario");
    let report = scenario.apply(&mut registry);

    if json {
        print_json(&serde_json::json!({
            "outcomes": report.outcomes,
            "stopped_at": report.stopped_at,
            "lights": registry.list(),
        }))?;
    } else {
        print_outcomes(&report);
        println!();
        print_lights(registry.list());
    }

    if let Some(step) = report.stopped_at {
        let reason = report
            .outcomes
            .last()
            .map(|o| o.outcome.to_string())
            .unwrap_or_default();
        anyhow::bail!("scenario stopped at step {step}: {reason}");
    }
    Ok(())
}

fn print_outcomes(report: &ScenarioReport) {
    let rows: Vec<Vec<String>> = report
        .outcomes
        .iter()
        .map(|o| vec![o.step.to_string(), o.op.clone(), o.outcome.to_string()])
        .collect();
    print_table(&["STEP", "OP", "RESULT"], &rows);
}
