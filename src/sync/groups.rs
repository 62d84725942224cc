use crate::myvr::resources::{ExistingMembership, MembershipPayload};
use crate::myvr::{MyVrApi, MyVrApiExt};
use crate::sync::{fetch_existing, StepReport};
use tracing::warn;

/// Add the property to every configured group it is not in yet.
/// Memberships are never removed.
pub async fn sync_groups(api: &dyn MyVrApi, external_id: &str, group_keys: &[String]) -> StepReport {
    let mut report = StepReport::default();

    let Some(existing) = fetch_existing::<ExistingMembership>(
        api,
        &format!("/property-memberships/?property={}", external_id),
    )
    .await
    else {
        report.failed += 1;
        return report;
    };

    let current: Vec<&str> = existing.iter().map(|membership| membership.group.key()).collect();

    for group in group_keys {
        if current.contains(&group.as_str()) {
            report.skipped += 1;
            continue;
        }

        let payload = MembershipPayload {
            group: group.clone(),
            property: external_id.to_string(),
        };
        match api.post_json("/property-memberships/", &payload).await {
            Ok(created) => report.record_created(created),
            Err(e) => {
                warn!(%external_id, %group, error = %e, "Failed to add property to group");
                report.failed += 1;
            }
        }
    }

    report
}
