use crate::common::*;
use crate::scenarios::{Scenario, ScenarioContext};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub settings: SettingsOverrides,
    pub scenarios: Vec<String>,
    pub report_file: Option<PathBuf>,
    pub quiet: bool,
}

pub struct RunCommand {
    working_directory: PathBuf,
    output_manager: OutputManager,
}

impl RunCommand {
    pub fn new(working_directory: PathBuf) -> Self {
        Self {
            working_directory,
            output_manager: OutputManager::new(),
        }
    }

    pub async fn execute(mut self, options: RunOptions) -> Result<()> {
        self.output_manager = self.output_manager.with_quiet(options.quiet);

        let selected = select_scenarios(&options.scenarios)?;
        let settings = HarnessSettings::load(options.settings)?;
        let fixtures = FixtureLayout::resolve(&settings, &self.working_directory)?;
        let interpolator =
            BoshInterpolator::new(&settings.bosh_binary).with_timeout(settings.timeout());

        log::info!(
            "Interpolating {} under {} with {}",
            fixtures.manifest_path.display(),
            fixtures.home.display(),
            interpolator.binary()
        );

        let vars_file = settings
            .vars_file
            .as_deref()
            .map(|path| absolute_from(&self.working_directory, path));
        let ctx = ScenarioContext::new(&fixtures, &interpolator).with_vars_file(vars_file);
        let report = self.run_scenarios(&selected, &ctx, options.quiet).await;

        if let Some(path) = &options.report_file {
            report.write_json(path)?;
            log::info!("Wrote report to {}", path.display());
        }

        self.output_manager.print_summary(&report);
        report.into_result()
    }

    /// Runs every scenario in order; a failing one never stops the rest.
    pub async fn run_scenarios<I: Interpolator>(
        &self,
        scenarios: &[Scenario],
        ctx: &ScenarioContext<'_, I>,
        quiet: bool,
    ) -> RunReport {
        let progress = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(scenarios.len() as u64)
        };
        progress.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut report = RunReport::start();
        for scenario in scenarios {
            progress.set_message(scenario.name());
            let outcome = run_one(scenario, ctx).await;
            progress.suspend(|| self.output_manager.print_outcome(&outcome));
            report.record(outcome);
            progress.inc(1);
        }
        progress.finish_and_clear();

        report.finish();
        report
    }
}

async fn run_one<I: Interpolator>(
    scenario: &Scenario,
    ctx: &ScenarioContext<'_, I>,
) -> ScenarioOutcome {
    let started = Instant::now();
    log::debug!("Running scenario {}", scenario.name());

    let missing = ctx.fixtures.missing_overlays(scenario.overlays());
    let result = if missing.is_empty() {
        scenario.run(ctx).await
    } else {
        Err(HarnessError::Invocation(format!(
            "overlay(s) not found under {}: {}",
            ctx.fixtures.operations_dir.display(),
            missing.join(", ")
        )))
    };

    if let Err(e) = &result {
        log::warn!("Scenario {} did not complete: {}", scenario.name(), e);
    }
    ScenarioOutcome::from_result(scenario.name(), result, started.elapsed().as_millis() as u64)
}

/// The tool runs inside the overlays directory, so relative paths are
/// anchored to where the harness was started.
fn absolute_from(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Resolves `--scenario` names; no names means the whole suite.
pub fn select_scenarios(names: &[String]) -> Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(Scenario::ALL.to_vec());
    }

    names
        .iter()
        .map(|name| {
            Scenario::from_name(name).ok_or_else(|| {
                HarnessError::ValidationError(format!(
                    "Unknown scenario: {}. Run 'opsfile-semantics list' to see available scenarios",
                    name
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::interpolator::testing::*;
    use crate::scenarios::testing::fixture_layout;
    use crate::scenarios::{isolation_segment, rename_network, scale_to_one_az, use_aws};

    #[test]
    fn test_select_scenarios() {
        assert_eq!(select_scenarios(&[]).unwrap().len(), Scenario::ALL.len());

        let selected = select_scenarios(&["aws.yml".to_string(), "scale-to-one-az.yml".to_string()]).unwrap();
        assert_eq!(selected, vec![Scenario::Aws, Scenario::ScaleToOneAz]);

        let result = select_scenarios(&["bogus.yml".to_string()]);
        assert!(matches!(result, Err(HarnessError::ValidationError(_))));
    }

    #[test]
    fn test_relative_vars_file_is_anchored_to_working_directory() {
        let base = Path::new("/home/ci/cf-deployment");
        assert_eq!(
            absolute_from(base, Path::new("vars/bbl.yml")),
            PathBuf::from("/home/ci/cf-deployment/vars/bbl.yml")
        );
        assert_eq!(absolute_from(base, Path::new("/etc/vars.yml")), PathBuf::from("/etc/vars.yml"));
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_later_scenarios() {
        let (temp_dir, layout) = fixture_layout(&[rename_network::OVERLAY, use_aws::OVERLAY]);
        let interpolator = ScriptedInterpolator::new()
            .fail(with_ops(rename_network::OVERLAY), "Expected to find variable 'network_name'")
            .respond(
                with_ops(use_aws::OVERLAY),
                "instance_groups:\n  - name: doppler\n    jobs:\n      - properties:\n          doppler:\n            port: 4443\n",
            );
        let ctx = ScenarioContext::new(&layout, &interpolator);

        let command = RunCommand::new(temp_dir.path().to_path_buf());
        let report = command
            .run_scenarios(
                &[Scenario::RenameNetwork, Scenario::ScaleToOneAz, Scenario::Aws],
                &ctx,
                true,
            )
            .await;

        assert_eq!(report.outcomes.len(), 3);
        assert!(!report.outcomes[0].passed());
        assert!(report.outcomes[0].error.as_deref().unwrap().contains("network_name"));

        // scale-to-one-az.yml is absent from the fixture tree, so nothing is spawned for it.
        assert!(!report.outcomes[1].passed());
        assert!(report.outcomes[1].error.as_deref().unwrap().contains(scale_to_one_az::OVERLAY));
        assert_eq!(interpolator.call_count(), 2);

        assert!(report.outcomes[2].passed());
        assert!(matches!(
            report.into_result(),
            Err(HarnessError::ScenariosFailed { failed: 2, total: 3 })
        ));
    }

    #[tokio::test]
    async fn test_isolation_segment_diff_is_kept_as_note() {
        let (temp_dir, layout) = fixture_layout(&[isolation_segment::OVERLAY]);
        let interpolator = ScriptedInterpolator::new()
            .respond(with_ops(isolation_segment::OVERLAY), "rep:\n  placement_tags: [persistent_isolation_segment]\n")
            .respond(without_ops(), "rep: {}\n");
        let ctx = ScenarioContext::new(&layout, &interpolator);

        let command = RunCommand::new(temp_dir.path().to_path_buf());
        let report = command.run_scenarios(&[Scenario::IsolationSegment], &ctx, true).await;

        let outcome = &report.outcomes[0];
        assert_eq!(outcome.notes.len(), 1);
        assert!(!outcome.passed());
    }
}
