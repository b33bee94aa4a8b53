use crate::common::*;
use crate::scenarios::ScenarioContext;

pub const OVERLAY: &str = "scale-to-one-az.yml";
pub const EXPECTED_AZ: &str = "z1";
pub const EXPECTED_INSTANCES: i64 = 1;

pub async fn run<I: Interpolator>(ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
    let manifest = ctx.invoke_and_decode(&ctx.request().ops_file(OVERLAY)).await?;
    Ok(Findings::from_failures(check(&manifest)))
}

pub fn check(manifest: &Manifest) -> Vec<AssertionFailure> {
    let mut failures = Vec::new();

    for ig in &manifest.instance_groups {
        if let Some(instances) = ig.instances {
            if instances != EXPECTED_INSTANCES {
                failures.push(AssertionFailure::new(
                    &ig.name,
                    instances,
                    EXPECTED_INSTANCES,
                    format!(
                        "{} has {} instances but expected to have {}",
                        ig.name, instances, EXPECTED_INSTANCES
                    ),
                ));
            }
        }

        if ig.azs != [EXPECTED_AZ] {
            failures.push(AssertionFailure::new(
                &ig.name,
                format!("{:?}", ig.azs),
                format!("[{:?}]", EXPECTED_AZ),
                format!("{} should have single AZ named '{}'", ig.name, EXPECTED_AZ),
            ));
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_az_with_one_or_unset_instances_passes() {
        let manifest = Manifest::from_str(
            "instance_groups:\n  - name: api\n    instances: 1\n    azs: [z1]\n  - name: smoke-tests\n    azs: [z1]\n",
        )
        .unwrap();
        assert!(check(&manifest).is_empty());
    }

    #[test]
    fn test_extra_instances_and_azs_fail() {
        let manifest = Manifest::from_str(
            "instance_groups:\n  - name: diego-cell\n    instances: 3\n    azs: [z1, z2]\n  - name: nats\n    instances: 1\n    azs: [z2]\n  - name: uaa\n    instances: 0\n    azs: []\n",
        )
        .unwrap();

        let failures = check(&manifest);
        let entities: Vec<&str> = failures.iter().map(|f| f.entity.as_str()).collect();
        assert_eq!(entities, vec!["diego-cell", "diego-cell", "nats", "uaa", "uaa"]);
        assert_eq!(failures[0].message, "diego-cell has 3 instances but expected to have 1");
        assert_eq!(failures[1].observed, r#"["z1", "z2"]"#);
        assert_eq!(failures[3].observed, "0");
    }

    #[test]
    fn test_negative_instances_and_null_azs_are_reported() {
        let manifest =
            Manifest::from_str("instance_groups:\n  - name: router\n    instances: -1\n    azs: ~\n").unwrap();

        let failures = check(&manifest);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].message, "router has -1 instances but expected to have 1");
        assert_eq!(failures[1].message, "router should have single AZ named 'z1'");
        assert_eq!(failures[1].observed, "[]");
    }
}
