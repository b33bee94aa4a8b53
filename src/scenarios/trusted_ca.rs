use crate::common::*;
use crate::scenarios::ScenarioContext;

pub const OVERLAY: &str = "use-trusted-ca-cert-for-apps.yml";
pub const CERTS_PATH: &str =
    "/instance_groups/name=diego-cell/jobs/name=cflinuxfs2-rootfs-setup/properties/cflinuxfs2-rootfs/trusted_certs";

pub async fn run<I: Interpolator>(ctx: &ScenarioContext<'_, I>) -> Result<Findings> {
    let existing = ctx.invoke_raw(&ctx.request().path(CERTS_PATH)).await?;
    let updated = ctx
        .invoke_raw(&ctx.request().path(CERTS_PATH).ops_file(OVERLAY))
        .await?;

    let mut findings = Findings::default();
    if let Some(failure) = check(&existing, &updated) {
        findings.fail(failure);
    }
    Ok(findings)
}

/// Fails when the overlay's CA list is wholly contained in the existing one.
pub fn check(existing_raw: &[u8], updated_raw: &[u8]) -> Option<AssertionFailure> {
    let (existing, updated) = format_cas(existing_raw, updated_raw);
    if !existing.contains(&updated) {
        return None;
    }

    Some(AssertionFailure::new(
        "diego-cell",
        "trusted CAs not extended",
        "existing trusted CAs plus the overlay's",
        format!(
            "{} overwrites existing trusted CAs from cf-deployment.yml.\nTrusted CAs before applying the ops file:\n\n{}\n\nTrusted CAs after applying the ops file:\n\n{}",
            OVERLAY, existing, updated
        ),
    ))
}

fn format_cas(existing_raw: &[u8], updated_raw: &[u8]) -> (String, String) {
    (
        String::from_utf8_lossy(existing_raw).trim().to_string(),
        String::from_utf8_lossy(updated_raw).trim().to_string(),
    )
}
