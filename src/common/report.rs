use crate::common::{HarnessError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A decoded or extracted value that broke a scenario's expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    pub entity: String,
    pub observed: String,
    pub expected: String,
    pub message: String,
}

impl AssertionFailure {
    pub fn new(
        entity: &str,
        observed: impl fmt::Display,
        expected: impl fmt::Display,
        message: String,
    ) -> Self {
        Self {
            entity: entity.to_string(),
            observed: observed.to_string(),
            expected: expected.to_string(),
            message,
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}: observed {}, expected {}]",
            self.message, self.entity, self.observed, self.expected
        )
    }
}

/// What a scenario found: failed assertions plus free-form diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub failures: Vec<AssertionFailure>,
    pub notes: Vec<String>,
}

impl Findings {
    pub fn from_failures(failures: Vec<AssertionFailure>) -> Self {
        Self {
            failures,
            notes: Vec::new(),
        }
    }

    pub fn fail(&mut self, failure: AssertionFailure) {
        self.failures.push(failure);
    }

    pub fn note(&mut self, note: String) {
        self.notes.push(note);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    pub status: ScenarioStatus,
    #[serde(default)]
    pub failures: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    pub fn from_result(scenario: &str, result: Result<Findings>, duration_ms: u64) -> Self {
        match result {
            Ok(findings) => Self {
                scenario: scenario.to_string(),
                status: if findings.is_clean() {
                    ScenarioStatus::Passed
                } else {
                    ScenarioStatus::Failed
                },
                failures: findings
                    .failures
                    .iter()
                    .map(|failure| format!("{}: {}", scenario, failure))
                    .collect(),
                error: None,
                notes: findings.notes,
                duration_ms,
            },
            Err(e) => Self {
                scenario: scenario.to_string(),
                status: ScenarioStatus::Failed,
                failures: Vec::new(),
                error: Some(format!("{}: {}", scenario, e)),
                notes: Vec::new(),
                duration_ms,
            },
        }
    }

    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: ScenarioOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn into_result(self) -> Result<()> {
        if self.all_passed() {
            Ok(())
        } else {
            Err(HarnessError::ScenariosFailed {
                failed: self.failed(),
                total: self.outcomes.len(),
            })
        }
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn failure() -> AssertionFailure {
        AssertionFailure::new(
            "router",
            "default",
            "test_network",
            "network name 'default' on instance 'router' does not match expected network name 'test_network'"
                .to_string(),
        )
    }

    #[test]
    fn test_outcome_prefixes_scenario_name() {
        let outcome = ScenarioOutcome::from_result(
            "rename-network-and-deployment.yml",
            Ok(Findings::from_failures(vec![failure()])),
            12,
        );
        assert_eq!(outcome.status, ScenarioStatus::Failed);
        assert!(outcome.failures[0].starts_with("rename-network-and-deployment.yml: network name"));
        assert!(outcome.failures[0].contains("observed default, expected test_network"));
    }

    #[test]
    fn test_error_becomes_failed_outcome() {
        let outcome = ScenarioOutcome::from_result(
            "aws.yml",
            Err(HarnessError::Invocation("exit status 1".to_string())),
            3,
        );
        assert!(!outcome.passed());
        assert_eq!(outcome.error.as_deref(), Some("aws.yml: Invocation error: exit status 1"));
    }

    #[test]
    fn test_notes_are_kept_in_json_report() {
        let mut findings = Findings::default();
        findings.note(" diego:\n+  placement_tags:".to_string());

        let mut report = RunReport::start();
        report.record(ScenarioOutcome::from_result(
            "test/add-persistent-isolation-segment-diego-cell.yml",
            Ok(findings),
            4,
        ));
        report.finish();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][0]["notes"][0], " diego:\n+  placement_tags:");

        let restored: RunReport = serde_json::from_value(json).unwrap();
        assert_eq!(restored.outcomes[0].notes, report.outcomes[0].notes);
    }

    #[test]
    fn test_report_result_and_json() {
        let mut report = RunReport::start();
        report.record(ScenarioOutcome::from_result("aws.yml", Ok(Findings::default()), 1));
        report.record(ScenarioOutcome::from_result(
            "scale-to-one-az.yml",
            Ok(Findings::from_failures(vec![failure()])),
            1,
        ));
        report.finish();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        report.write_json(&path).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["outcomes"][0]["status"], "passed");
        assert_eq!(parsed["outcomes"][1]["status"], "failed");
        assert!(parsed["outcomes"][0].get("notes").is_none());

        assert!(matches!(
            report.into_result(),
            Err(HarnessError::ScenariosFailed { failed: 1, total: 2 })
        ));
    }
}
