use crate::common::*;
use crate::scenarios::ScenarioContext;

pub const OVERLAY: &str = "test/add-persistent-isolation-segment-diego-cell.yml";
pub const DIEGO_CELL_REP_PATH: &str = "/instance_groups/name=diego-cell/jobs/name=rep/properties";
pub const ISOLATED_REP_PATH: &str = "/instance_groups/name=isolated-diego-cell/jobs/name=rep/properties";

/// Lines the overlay is expected to add on top of the diego-cell rep properties.
pub const ISOLATION_KEYS: [&str; 2] = ["placement_tags", "persistent_isolation_segment"];

pub async fn run<I: Interpolator>(ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
    let diego_cell = ctx.invoke_raw(&ctx.request().path(DIEGO_CELL_REP_PATH)).await?;
    let isolated = ctx
        .invoke_raw(&ctx.request().path(ISOLATED_REP_PATH).ops_file(OVERLAY))
        .await?;

    Ok(check(
        &String::from_utf8_lossy(&diego_cell),
        &String::from_utf8_lossy(&isolated),
    ))
}

/// Always records the full diff as a note, then fails if anything beyond
/// the isolation keys differs.
pub fn check(diego_cell: &str, isolated: &str) -> Findings {
    let diego_cell = as_echoed(diego_cell);
    let isolated = as_echoed(isolated);

    let mut findings = Findings::default();
    findings.note(LineDiff::compute(&diego_cell, &isolated).to_plain());

    let filtered = as_echoed(&strip_lines_containing(&isolated, &ISOLATION_KEYS));
    let remaining = LineDiff::compute(&diego_cell, &filtered);
    if remaining.has_changes() {
        findings.fail(AssertionFailure::new(
            "isolated-diego-cell",
            format!("{} removed, {} added lines", remaining.deletions(), remaining.insertions()),
            "no differences outside placement_tags and persistent_isolation_segment",
            format!(
                "rep properties on diego-cell have diverged between cf-deployment.yml and {}:\n{}",
                OVERLAY,
                remaining.to_plain()
            ),
        ));
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::interpolator::testing::*;
    use crate::scenarios::testing::fixture_layout;

    const DIEGO_CELL_REP: &str = "diego:\n  executor:\n    memory_capacity_mb: 30720\n  rep:\n    preloaded_rootfses:\n    - cflinuxfs2:/var/vcap/packages/cflinuxfs2/rootfs.tar\n";
    const ISOLATED_REP: &str = "diego:\n  executor:\n    memory_capacity_mb: 30720\n  rep:\n    placement_tags:\n    - persistent_isolation_segment\n    preloaded_rootfses:\n    - cflinuxfs2:/var/vcap/packages/cflinuxfs2/rootfs.tar\n";

    #[test]
    fn test_only_isolation_keys_differ() {
        let findings = check(DIEGO_CELL_REP, ISOLATED_REP);
        assert!(findings.is_clean());
        assert_eq!(findings.notes.len(), 1);
        assert!(findings.notes[0].contains("placement_tags"));
    }

    #[test]
    fn test_diverged_properties_fail() {
        let diverged = ISOLATED_REP.replace("30720", "16384");
        let findings = check(DIEGO_CELL_REP, &diverged);

        assert_eq!(findings.failures.len(), 1);
        let failure = &findings.failures[0];
        assert_eq!(failure.entity, "isolated-diego-cell");
        assert_eq!(failure.observed, "1 removed, 1 added lines");
        assert!(failure.message.contains("+    memory_capacity_mb: 16384"));
    }

    #[test]
    fn test_trailing_newline_difference_passes() {
        let without_newline = ISOLATED_REP.trim_end_matches('\n');
        assert!(check(DIEGO_CELL_REP, without_newline).is_clean());

        let with_blank_tail = format!("{}\n\n", ISOLATED_REP);
        assert!(check(DIEGO_CELL_REP, &with_blank_tail).is_clean());
        assert!(check(DIEGO_CELL_REP.trim_end_matches('\n'), ISOLATED_REP).is_clean());
    }

    #[test]
    fn test_note_is_plain_text() {
        let findings = check(DIEGO_CELL_REP, ISOLATED_REP);
        assert!(findings.notes[0].contains("+    placement_tags:"));
        assert!(!findings.notes[0].contains('\u{1b}'));
    }

    #[tokio::test]
    async fn test_run_extracts_both_rep_subtrees() {
        let (_temp_dir, layout) = fixture_layout(&[OVERLAY]);
        let interpolator = ScriptedInterpolator::new()
            .respond(with_ops(OVERLAY), ISOLATED_REP)
            .respond(without_ops(), DIEGO_CELL_REP);
        let ctx = ScenarioContext::new(&layout, &interpolator);

        let findings = run(&ctx).await.unwrap();
        assert!(findings.is_clean());

        let calls = interpolator.calls.borrow();
        assert_eq!(calls[0].path.as_deref(), Some(DIEGO_CELL_REP_PATH));
        assert_eq!(calls[1].path.as_deref(), Some(ISOLATED_REP_PATH));
    }
}
