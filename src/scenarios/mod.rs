//! The named semantic checks run against `bosh interpolate` output.
//!
//! Each scenario owns its overlays, variables and assertions. Scenarios never
//! share state: every one builds its own request, decodes its own projection
//! and hands back [`Findings`].

pub mod compiled_releases;
pub mod deterministic;
pub mod isolation_segment;
pub mod rename_network;
pub mod scale_to_one_az;
pub mod trusted_ca;
pub mod use_aws;

use crate::common::*;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    RenameNetwork,
    Aws,
    ScaleToOneAz,
    CompiledReleases,
    TrustedCa,
    IsolationSegment,
    Deterministic,
}

impl Scenario {
    pub const ALL: [Scenario; 7] = [
        Scenario::RenameNetwork,
        Scenario::Aws,
        Scenario::ScaleToOneAz,
        Scenario::CompiledReleases,
        Scenario::TrustedCa,
        Scenario::IsolationSegment,
        Scenario::Deterministic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::RenameNetwork => rename_network::OVERLAY,
            Scenario::Aws => use_aws::OVERLAY,
            Scenario::ScaleToOneAz => scale_to_one_az::OVERLAY,
            Scenario::CompiledReleases => compiled_releases::OVERLAY,
            Scenario::TrustedCa => trusted_ca::OVERLAY,
            Scenario::IsolationSegment => "add-persistent-isolation-segment-diego-cell.yml",
            Scenario::Deterministic => "deterministic-interpolation",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::RenameNetwork => "every instance group sits on the single renamed network",
            Scenario::Aws => "doppler ports are rewritten to 4443",
            Scenario::ScaleToOneAz => "every instance group runs one instance in z1",
            Scenario::CompiledReleases => "no release is fetched from a source-compiled origin",
            Scenario::TrustedCa => "trusted CA overlay adds to the existing trusted certs",
            Scenario::IsolationSegment => "isolated diego-cell rep properties track diego-cell",
            Scenario::Deterministic => "interpolating the base manifest twice gives the same projection",
        }
    }

    /// Overlay files the scenario needs, relative to the operations directory.
    pub fn overlays(&self) -> &'static [&'static str] {
        match self {
            Scenario::RenameNetwork => &[rename_network::OVERLAY],
            Scenario::Aws => &[use_aws::OVERLAY],
            Scenario::ScaleToOneAz => &[scale_to_one_az::OVERLAY],
            Scenario::CompiledReleases => &[compiled_releases::OVERLAY],
            Scenario::TrustedCa => &[trusted_ca::OVERLAY],
            Scenario::IsolationSegment => &[isolation_segment::OVERLAY],
            Scenario::Deterministic => &[],
        }
    }

    pub fn from_name(name: &str) -> Option<Scenario> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    pub async fn run<I: Interpolator>(&self, ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
        match self {
            Scenario::RenameNetwork => rename_network::run(ctx).await,
            Scenario::Aws => use_aws::run(ctx).await,
            Scenario::ScaleToOneAz => scale_to_one_az::run(ctx).await,
            Scenario::CompiledReleases => compiled_releases::run(ctx).await,
            Scenario::TrustedCa => trusted_ca::run(ctx).await,
            Scenario::IsolationSegment => isolation_segment::run(ctx).await,
            Scenario::Deterministic => deterministic::run(ctx).await,
        }
    }
}

/// Borrowed view of the fixture tree and interpolator handed to each scenario.
pub struct ScenarioContext<'a, I: Interpolator> {
    pub fixtures: &'a FixtureLayout,
    pub interpolator: &'a I,
    pub vars_file: Option<PathBuf>,
}

impl<'a, I: Interpolator> ScenarioContext<'a, I> {
    pub fn new(fixtures: &'a FixtureLayout, interpolator: &'a I) -> Self {
        Self {
            fixtures,
            interpolator,
            vars_file: None,
        }
    }

    pub fn with_vars_file(mut self, vars_file: Option<PathBuf>) -> Self {
        self.vars_file = vars_file;
        self
    }

    /// A request against the base manifest with no overlays applied yet.
    pub fn request(&self) -> InterpolateRequest {
        InterpolateRequest::new(&self.fixtures.manifest_path, &self.fixtures.operations_dir)
            .with_vars_file(self.vars_file.clone())
    }

    pub async fn invoke_raw(&self, request: &InterpolateRequest) -> Result<Vec<u8>> {
        self.interpolator.interpolate(request).await
    }

    pub async fn invoke_and_decode(&self, request: &InterpolateRequest) -> Result<Manifest> {
        let bytes = self.invoke_raw(request).await?;
        Manifest::from_slice(&bytes)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::common::fixtures::testing::write_fixture_tree;
    use crate::common::FixtureLayout;
    use tempfile::TempDir;

    pub fn fixture_layout(overlays: &[&str]) -> (TempDir, FixtureLayout) {
        let temp_dir = TempDir::new().unwrap();
        write_fixture_tree(temp_dir.path(), overlays);
        let layout = FixtureLayout::new(temp_dir.path(), "cf-deployment.yml", "operations").unwrap();
        (temp_dir, layout)
    }
}
