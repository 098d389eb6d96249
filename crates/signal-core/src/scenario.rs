use crate::error::Result;
use crate::light::TrafficLight;
use crate::registry::TrafficLightRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One registry call in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Create { signal_id: String, timing: i64 },
    Read { signal_id: String },
    Update { signal_id: String, timing: i64 },
    Delete { signal_id: String },
    Optimize { signal_id: String },
    Activate { signal_id: String },
    Deactivate { signal_id: String },
    Analyze { impact_id: String },
    List,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Create { .. } => "create",
            Step::Read { .. } => "read",
            Step::Update { .. } => "update",
            Step::Delete { .. } => "delete",
            Step::Optimize { .. } => "optimize",
            Step::Activate { .. } => "activate",
            Step::Deactivate { .. } => "deactivate",
            Step::Analyze { .. } => "analyze",
            Step::List => "list",
        }
    }

    pub fn signal_id(&self) -> Option<&str> {
        match self {
            Step::Create { signal_id, .. }
            | Step::Read { signal_id }
            | Step::Update { signal_id, .. }
            | Step::Delete { signal_id }
            | Step::Optimize { signal_id }
            | Step::Activate { signal_id }
            | Step::Deactivate { signal_id } => Some(signal_id),
            Step::Analyze { .. } | Step::List => None,
        }
    }

    fn run(&self, registry: &mut TrafficLightRegistry) -> Result<Outcome> {
        let outcome = match self {
            Step::Create { signal_id, timing } => {
                Outcome::Light(registry.create(signal_id.as_str(), *timing)?.clone())
            }
            Step::Read { signal_id } => match registry.read(signal_id) {
                Some(light) => Outcome::Light(light.clone()),
                None => Outcome::Absent,
            },
            Step::Update { signal_id, timing } => {
                registry.update(signal_id, *timing)?;
                Outcome::Done
            }
            Step::Delete { signal_id } => {
                registry.delete(signal_id)?;
                Outcome::Done
            }
            Step::Optimize { signal_id } => Outcome::Light(registry.optimize(signal_id)?.clone()),
            Step::Activate { signal_id } => {
                registry.activate(signal_id)?;
                Outcome::Done
            }
            Step::Deactivate { signal_id } => {
                registry.deactivate(signal_id)?;
                Outcome::Done
            }
            Step::Analyze { impact_id } => Outcome::Report(registry.analyze_impact(impact_id)),
            Step::List => Outcome::Lights(registry.list().into_iter().cloned().collect()),
        };
        Ok(outcome)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Create { signal_id, timing } | Step::Update { signal_id, timing } => {
                write!(f, "{} {signal_id} {timing}", self.as_str())
            }
            Step::Analyze { impact_id } => write!(f, "analyze {impact_id}"),
            Step::List => f.write_str("list"),
            other => match other.signal_id() {
                Some(id) => write!(f, "{} {id}", other.as_str()),
                None => f.write_str(other.as_str()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome / StepOutcome / ScenarioReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// Snapshot of the stored light right after the step.
    Light(TrafficLight),
    Absent,
    Done,
    Report(String),
    Lights(Vec<TrafficLight>),
    Failed(String),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Light(light) => write!(f, "{light}"),
            Outcome::Absent => f.write_str("absent"),
            Outcome::Done => f.write_str("ok"),
            Outcome::Report(text) => f.write_str(text),
            Outcome::Lights(lights) => write!(f, "{} light(s)", lights.len()),
            Outcome::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    /// 1-based position in the scenario.
    pub step: usize,
    pub op: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub outcomes: Vec<StepOutcome>,
    /// Step number execution halted on, when `continue_on_error` is off.
    pub stopped_at: Option<usize>,
}

impl ScenarioReport {
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_failure())
    }
}

// ---------------------------------------------------------------------------
// ScenarioWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// A scripted sequence of registry calls loaded from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub continue_on_error: bool,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(data)?;
        Ok(scenario)
    }

    /// Run every step against `registry` in order.
    ///
    /// Registry errors become `Outcome::Failed`; execution halts at the first
    /// one unless `continue_on_error` is set.
    pub fn apply(&self, registry: &mut TrafficLightRegistry) -> ScenarioReport {
        let mut outcomes = Vec::with_capacity(self.steps.len());
        let mut stopped_at = None;

        for (i, step) in self.steps.iter().enumerate() {
            let number = i + 1;
            let outcome = match step.run(registry) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::debug!(step = number, op = step.as_str(), error = %e, "scenario step failed");
                    Outcome::Failed(e.to_string())
                }
            };
            let failed = outcome.is_failure();
            outcomes.push(StepOutcome {
                step: number,
                op: step.to_string(),
                outcome,
            });
            if failed && !self.continue_on_error {
                stopped_at = Some(number);
                break;
            }
        }

        ScenarioReport {
            outcomes,
            stopped_at,
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Static checks that track which ids are live as the steps would run.
    pub fn validate(&self) -> Vec<ScenarioWarning> {
        let mut warnings = Vec::new();

        if self.steps.is_empty() {
            warnings.push(ScenarioWarning {
                level: WarnLevel::Error,
                message: "scenario has no steps".to_string(),
            });
            return warnings;
        }

        let mut live: BTreeSet<&str> = BTreeSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            let number = i + 1;
            match step {
                Step::Create { signal_id, .. } => {
                    if !live.insert(signal_id.as_str()) {
                        warnings.push(ScenarioWarning {
                            level: WarnLevel::Warning,
                            message: format!(
                                "step {number}: '{signal_id}' is already registered; create will fail"
                            ),
                        });
                    }
                }
                Step::Read { .. } | Step::Analyze { .. } | Step::List => {}
                other => {
                    let Some(id) = other.signal_id() else {
                        continue;
                    };
                    if !live.contains(id) {
                        warnings.push(ScenarioWarning {
                            level: WarnLevel::Warning,
                            message: format!(
                                "step {number}: '{id}' is not registered at this point; {} will fail",
                                other.as_str()
                            ),
                        });
                    }
                    if matches!(other, Step::Delete { .. }) {
                        live.remove(id);
                    }
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BASIC: &str = r#"
steps:
  - op: create
    signal_id: A
    timing: 45
  - op: create
    signal_id: B
    timing: 60
  - op: update
    signal_id: A
    timing: 50
  - op: delete
    signal_id: B
  - op: read
    signal_id: B
  - op: optimize
    signal_id: A
  - op: analyze
    impact_id: "7"
  - op: list
"#;

    #[test]
    fn parses_all_step_kinds() {
        let yaml = r#"
continue_on_error: true
steps:
  - op: create
    signal_id: A
    timing: 45
  - op: read
    signal_id: A
  - op: update
    signal_id: A
    timing: 10
  - op: activate
    signal_id: A
  - op: deactivate
    signal_id: A
  - op: optimize
    signal_id: A
  - op: delete
    signal_id: A
  - op: analyze
    impact_id: "x"
  - op: list
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert!(scenario.continue_on_error);
        let ops: Vec<&str> = scenario.steps.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            ops,
            vec![
                "create", "read", "update", "activate", "deactivate", "optimize", "delete",
                "analyze", "list"
            ]
        );
        assert_eq!(
            scenario.steps[0],
            Step::Create {
                signal_id: "A".to_string(),
                timing: 45
            }
        );
    }

    #[test]
    fn unknown_op_is_rejected() {
        let yaml = "steps:\n  - op: explode\n    signal_id: A\n";
        assert!(Scenario::from_yaml(yaml).is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scenario.yaml");
        std::fs::write(&path, BASIC).unwrap();
        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.steps.len(), 8);
        assert!(!scenario.continue_on_error);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Scenario::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, crate::SignalError::Io(_)));
    }

    #[test]
    fn apply_basic_scenario() {
        let scenario = Scenario::from_yaml(BASIC).unwrap();
        let mut registry = TrafficLightRegistry::new();
        let report = scenario.apply(&mut registry);

        assert!(report.stopped_at.is_none());
        assert_eq!(report.outcomes.len(), 8);
        assert_eq!(report.outcomes[4].outcome, Outcome::Absent);
        match &report.outcomes[5].outcome {
            Outcome::Light(light) => assert_eq!(light.timing(), 30),
            other => panic!("expected light, got {other:?}"),
        }
        match &report.outcomes[6].outcome {
            Outcome::Report(text) => {
                assert!(text.contains("Analysis Report"));
                assert!(text.contains('7'));
            }
            other => panic!("expected report, got {other:?}"),
        }
        match &report.outcomes[7].outcome {
            Outcome::Lights(lights) => assert_eq!(lights, &vec![TrafficLight::new("A", 30)]),
            other => panic!("expected lights, got {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn apply_stops_at_first_failure() {
        let yaml = r#"
steps:
  - op: create
    signal_id: A
    timing: 45
  - op: create
    signal_id: A
    timing: 20
  - op: delete
    signal_id: A
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        let mut registry = TrafficLightRegistry::new();
        let report = scenario.apply(&mut registry);

        assert_eq!(report.stopped_at, Some(2));
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(
            report.outcomes[1].outcome,
            Outcome::Failed("Traffic light with this ID already exists.".to_string())
        );
        assert_eq!(registry.read("A").unwrap().timing(), 45);
    }

    #[test]
    fn apply_continue_on_error_runs_everything() {
        let yaml = r#"
continue_on_error: true
steps:
  - op: update
    signal_id: Z
    timing: 20
  - op: delete
    signal_id: Z
  - op: create
    signal_id: Z
    timing: 20
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        let mut registry = TrafficLightRegistry::new();
        let report = scenario.apply(&mut registry);

        assert!(report.stopped_at.is_none());
        assert_eq!(report.failures().count(), 2);
        assert!(registry.contains("Z"));
    }

    #[test]
    fn negative_timing_is_applied_as_given() {
        let yaml = "steps:\n  - op: create\n    signal_id: A\n    timing: -5\n";
        let scenario = Scenario::from_yaml(yaml).unwrap();
        let mut registry = TrafficLightRegistry::new();
        let report = scenario.apply(&mut registry);
        assert_eq!(report.outcomes[0].outcome, Outcome::Light(TrafficLight::new("A", -5)));
        assert_eq!(report.outcomes[0].op, "create A -5");
    }

    #[test]
    fn step_display() {
        let step = Step::Update {
            signal_id: "A".to_string(),
            timing: 50,
        };
        assert_eq!(step.to_string(), "update A 50");
        let step = Step::Optimize {
            signal_id: "A".to_string(),
        };
        assert_eq!(step.to_string(), "optimize A");
        assert_eq!(Step::List.to_string(), "list");
    }

    #[test]
    fn validate_clean_scenario_no_warnings() {
        let scenario = Scenario::from_yaml(BASIC).unwrap();
        assert!(scenario.validate().is_empty());
    }

    #[test]
    fn validate_empty_scenario_is_error() {
        let warnings = Scenario::default().validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
    }

    #[test]
    fn validate_flags_duplicates_and_unknown_ids() {
        let yaml = r#"
steps:
  - op: create
    signal_id: A
    timing: 45
  - op: create
    signal_id: A
    timing: 20
  - op: delete
    signal_id: A
  - op: optimize
    signal_id: A
  - op: update
    signal_id: Z
    timing: 20
"#;
        let warnings = Scenario::from_yaml(yaml).unwrap().validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
        assert!(warnings[0].message.contains("step 2"));
        assert!(warnings[1].message.contains("step 4"));
        assert!(warnings[2].message.contains("'Z'"));
    }

    #[test]
    fn outcome_serializes_tagged() {
        let value = serde_json::to_value(Outcome::Light(TrafficLight::new("A", 45))).unwrap();
        assert_eq!(value["kind"], "light");
        assert_eq!(value["value"]["timing"], 45);
        let value = serde_json::to_value(Outcome::Absent).unwrap();
        assert_eq!(value, serde_json::json!({ "kind": "absent" }));
    }
}
