use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TrafficLight
// ---------------------------------------------------------------------------

/// One signal: its identity, cycle timing in seconds, and whether it is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLight {
    signal_id: String,
    timing: i64,
    active: bool,
}

impl TrafficLight {
    /// New lights start active. `timing` is taken as given.
    pub fn new(signal_id: impl Into<String>, timing: i64) -> Self {
        Self {
            signal_id: signal_id.into(),
            timing,
            active: true,
        }
    }

    pub fn signal_id(&self) -> &str {
        &self.signal_id
    }

    pub fn timing(&self) -> i64 {
        self.timing
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn update_timing(&mut self, new_timing: i64) {
        self.timing = new_timing;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Human-readable form: `TrafficLight(signal_id=A, timing=45, active=true)`
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TrafficLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrafficLight(signal_id={}, timing={}, active={})",
            self.signal_id, self.timing, self.active
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
