use crate::common::*;
use crate::scenarios::ScenarioContext;
use regex::Regex;

pub const OVERLAY: &str = "use-compiled-releases.yml";

/// Origins that serve source releases rather than compiled ones.
pub const SOURCE_RELEASE_PATTERN: &str = r"github\.com|bosh\.com";

pub async fn run<I: Interpolator>(ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
    let pattern = Regex::new(SOURCE_RELEASE_PATTERN)?;
    let manifest = ctx.invoke_and_decode(&ctx.request().ops_file(OVERLAY)).await?;
    Ok(Findings::from_failures(check(&manifest, &pattern)))
}

pub fn check(manifest: &Manifest, source_origin: &Regex) -> Vec<AssertionFailure> {
    manifest
        .releases
        .iter()
        .filter(|release| source_origin.is_match(&release.url))
        .map(|release| {
            AssertionFailure::new(
                &release.name,
                &release.url,
                format!("a URL not matching {}", source_origin.as_str()),
                format!(
                    "expected release {} to be compiled, but got the release from {}",
                    release.name, release.url
                ),
            )
        })
        .collect()
}
