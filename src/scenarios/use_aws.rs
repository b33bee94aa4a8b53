use crate::common::*;
use crate::scenarios::ScenarioContext;

pub const OVERLAY: &str = "aws.yml";
pub const DOPPLER_PORT: i64 = 4443;

pub async fn run<I: Interpolator>(ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
    let manifest = ctx.invoke_and_decode(&ctx.request().ops_file(OVERLAY)).await?;
    Ok(Findings::from_failures(check(&manifest, DOPPLER_PORT)))
}

/// Jobs without a doppler port are left alone.
pub fn check(manifest: &Manifest, expected_port: i64) -> Vec<AssertionFailure> {
    manifest
        .instance_groups
        .iter()
        .flat_map(|ig| {
            ig.jobs
                .iter()
                .filter_map(|job| job.doppler_port())
                .filter(move |port| *port != expected_port)
                .map(move |port| {
                    AssertionFailure::new(
                        &ig.name,
                        port,
                        expected_port,
                        format!(
                            "port number '{}' on instance '{}' does not match expected port number '{}'",
                            port, ig.name, expected_port
                        ),
                    )
                })
        })
        .collect()
}
