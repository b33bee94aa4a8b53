use crate::common::*;
use crate::scenarios::ScenarioContext;

pub async fn run<I: Interpolator>(ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
    let request = ctx.request();
    let first = ctx.invoke_and_decode(&request).await?;
    let second = ctx.invoke_and_decode(&request).await?;
    Ok(Findings::from_failures(check(&first, &second)))
}

pub fn check(first: &Manifest, second: &Manifest) -> Vec<AssertionFailure> {
    let mut failures = Vec::new();

    if first.instance_groups.len() != second.instance_groups.len() {
        failures.push(AssertionFailure::new(
            "instance_groups",
            second.instance_groups.len(),
            first.instance_groups.len(),
            "instance group count changed between identical interpolations".to_string(),
        ));
    }
    for (a, b) in first.instance_groups.iter().zip(&second.instance_groups) {
        if a != b {
            failures.push(AssertionFailure::new(
                &a.name,
                format!("{:?}", b),
                format!("{:?}", a),
                format!("instance group '{}' differs between identical interpolations", a.name),
            ));
        }
    }

    if first.releases != second.releases {
        failures.push(AssertionFailure::new(
            "releases",
            format!("{:?}", second.releases),
            format!("{:?}", first.releases),
            "releases differ between identical interpolations".to_string(),
        ));
    }

    failures
}
