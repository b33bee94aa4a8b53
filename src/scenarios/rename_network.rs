use crate::common::*;
use crate::scenarios::ScenarioContext;

pub const OVERLAY: &str = "rename-network-and-deployment.yml";
pub const NETWORK_NAME: &str = "test_network";
pub const DEPLOYMENT_NAME: &str = "test_deployment";

pub async fn run<I: Interpolator>(ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
    let request = ctx
        .request()
        .ops_file(OVERLAY)
        .var("network_name", NETWORK_NAME)
        .var("deployment_name", DEPLOYMENT_NAME);

    let manifest = ctx.invoke_and_decode(&request).await?;
    Ok(Findings::from_failures(check(&manifest, NETWORK_NAME)))
}

pub fn check(manifest: &Manifest, expected_network: &str) -> Vec<AssertionFailure> {
    let mut failures = Vec::new();

    for ig in &manifest.instance_groups {
        if ig.networks.len() != 1 {
            failures.push(AssertionFailure::new(
                &ig.name,
                format!("{} networks", ig.networks.len()),
                "1 network",
                format!("instance group '{}' should only have 1 network", ig.name),
            ));
        }

        if let Some(network) = ig.networks.first() {
            if network.name != expected_network {
                failures.push(AssertionFailure::new(
                    &ig.name,
                    &network.name,
                    expected_network,
                    format!(
                        "network name '{}' on instance '{}' does not match expected network name '{}'",
                        network.name, ig.name, expected_network
                    ),
                ));
            }
        }
    }

    failures
}
