use crate::common::diff::colorize;
use crate::common::report::{RunReport, ScenarioOutcome, ScenarioStatus};
use colored::*;

pub struct OutputManager {
    quiet: bool,
}

impl OutputManager {
    pub fn new() -> Self {
        Self {
            quiet: std::env::var("SUPPRESS_ECHO").is_ok(),
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = self.quiet || quiet;
        self
    }

    pub fn print_msg(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    pub fn print_blue(&self, msg: &str) {
        self.print_msg(&msg.blue().to_string());
    }

    pub fn print_green(&self, msg: &str) {
        self.print_msg(&msg.green().to_string());
    }

    pub fn print_gray(&self, msg: &str) {
        self.print_msg(&msg.bright_black().to_string());
    }

    /// Failures go to stderr even when quiet.
    pub fn print_error(&self, msg: &str) {
        eprintln!("{}", format!("✗ {}", msg).red());
    }

    /// Notes are part of the result, so they print even when quiet.
    pub fn print_outcome(&self, outcome: &ScenarioOutcome) {
        for note in &outcome.notes {
            println!("{}", format!("--- {} ---", outcome.scenario).bright_black());
            println!("{}", colorize(note));
        }

        match outcome.status {
            ScenarioStatus::Passed => {
                self.print_green(&format!("✓ {} ({} ms)", outcome.scenario, outcome.duration_ms));
            }
            ScenarioStatus::Failed => {
                self.print_error(&format!("{} ({} ms)", outcome.scenario, outcome.duration_ms));
                if let Some(error) = &outcome.error {
                    eprintln!("    {}", error);
                }
                for failure in &outcome.failures {
                    eprintln!("    {}", failure);
                }
            }
        }
    }

    pub fn print_summary(&self, report: &RunReport) {
        let summary = format!(
            "{} passed, {} failed, {} total",
            report.passed(),
            report.failed(),
            report.outcomes.len()
        );
        if report.all_passed() {
            self.print_green(&summary);
        } else {
            self.print_error(&summary);
        }
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_is_sticky() {
        let output = OutputManager::new().with_quiet(true).with_quiet(false);
        assert!(output.quiet);
    }
}
