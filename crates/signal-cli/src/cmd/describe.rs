use crate::output::print_json;
use signal_core::TrafficLight;

pub fn run(signal_id: &str, timing: i64, inactive: bool, json: bool) -> anyhow::Result<()> {
    let mut light = TrafficLight::new(signal_id, timing);
    if inactive {
        light.deactivate();
    }

    if json {
        print_json(&light)?;
    } else {
        println!("{}", light.describe());
    }
    Ok(())
}
