use crate::error::{Result, SignalError};
use crate::light::TrafficLight;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Timing every `optimize` call assigns, in seconds.
pub const OPTIMIZED_TIMING_SECS: i64 = 30;

/// Canned impact report. Depends only on `impact_id`.
pub fn analysis_report(impact_id: impl fmt::Display) -> String {
    format!("Analysis Report for impact ID {impact_id}: Optimization appears to improve flow.")
}

// ---------------------------------------------------------------------------
// TrafficLightRegistry
// ---------------------------------------------------------------------------

/// In-memory store of traffic lights keyed by signal id.
///
/// The registry owns every light. Mutations go through `&mut self`, so a
/// borrowed light handed out by `create`, `read` or `optimize` always shows
/// the stored state. Failed operations leave the store untouched.
#[derive(Debug, Default)]
pub struct TrafficLightRegistry {
    lights: BTreeMap<String, TrafficLight>,
}

impl TrafficLightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, signal_id: impl Into<String>, timing: i64) -> Result<&TrafficLight> {
        let signal_id = signal_id.into();
        match self.lights.entry(signal_id) {
            Entry::Occupied(e) => Err(SignalError::DuplicateKey(e.key().clone())),
            Entry::Vacant(e) => {
                debug!(signal_id = %e.key(), timing, "traffic light created");
                let light = TrafficLight::new(e.key().clone(), timing);
                Ok(e.insert(light))
            }
        }
    }

    /// Look up a light. Absence is not an error.
    pub fn read(&self, signal_id: &str) -> Option<&TrafficLight> {
        self.lights.get(signal_id)
    }

    pub fn update(&mut self, signal_id: &str, new_timing: i64) -> Result<()> {
        let light = self.find_mut(signal_id)?;
        light.update_timing(new_timing);
        debug!(signal_id, timing = new_timing, "traffic light timing updated");
        Ok(())
    }

    pub fn delete(&mut self, signal_id: &str) -> Result<()> {
        self.lights
            .remove(signal_id)
            .ok_or_else(|| SignalError::NotFound(signal_id.to_string()))?;
        debug!(signal_id, "traffic light deleted");
        Ok(())
    }

    /// Set the light's timing to [`OPTIMIZED_TIMING_SECS`]. No traffic data
    /// is consulted.
    pub fn optimize(&mut self, signal_id: &str) -> Result<&TrafficLight> {
        let light = self.find_mut(signal_id)?;
        light.update_timing(OPTIMIZED_TIMING_SECS);
        debug!(signal_id, timing = OPTIMIZED_TIMING_SECS, "traffic light optimized");
        Ok(light)
    }

    pub fn activate(&mut self, signal_id: &str) -> Result<()> {
        self.find_mut(signal_id)?.activate();
        debug!(signal_id, "traffic light activated");
        Ok(())
    }

    pub fn deactivate(&mut self, signal_id: &str) -> Result<()> {
        self.find_mut(signal_id)?.deactivate();
        debug!(signal_id, "traffic light deactivated");
        Ok(())
    }

    /// Impact report for `impact_id`. Registry contents are not consulted.
    pub fn analyze_impact(&self, impact_id: impl fmt::Display) -> String {
        analysis_report(impact_id)
    }

    /// All lights, ordered by signal id.
    pub fn list(&self) -> Vec<&TrafficLight> {
        self.lights.values().collect()
    }

    pub fn contains(&self, signal_id: &str) -> bool {
        self.lights.contains_key(signal_id)
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    fn find_mut(&mut self, signal_id: &str) -> Result<&mut TrafficLight> {
        self.lights
            .get_mut(signal_id)
            .ok_or_else(|| SignalError::NotFound(signal_id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
