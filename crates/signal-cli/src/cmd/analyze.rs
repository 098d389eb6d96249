use crate::output::print_json;
use signal_core::analysis_report;

pub fn run(impact_id: &str, json: bool) -> anyhow::Result<()> {
    let report = analysis_report(impact_id);
    if json {
        print_json(&serde_json::json!({
            "impact_id": impact_id,
            "report": report,
        }))?;
    } else {
        println!("{report}");
    }
    Ok(())
}
