use crate::myvr::resources::{AmenityLinkPayload, ExistingAmenityLink};
use crate::myvr::{MyVrApi, MyVrApiExt};
use crate::sync::{fetch_existing, StepReport};
use tracing::warn;

/// MyVR amenity keys every IELV villa is linked to
pub const REFERENCE_AMENITIES: &[&str] = &[
    "air-conditioning",
    "internet",
    "wireless-internet",
    "tv",
    "cable-tv",
    "kitchen",
    "dishwasher",
    "washer",
    "dryer",
    "iron",
    "hair-dryer",
    "essentials",
    "linens",
    "towels",
    "pool",
    "ocean-view",
    "outdoor-dining",
    "bbq-grill",
    "parking",
    "safe",
];

/// Link every reference amenity the property is missing.
/// Existing links are left as they are.
pub async fn sync_amenities(api: &dyn MyVrApi, external_id: &str) -> StepReport {
    let mut report = StepReport::default();

    let Some(existing) = fetch_existing::<ExistingAmenityLink>(
        api,
        &format!("/property-amenities/?property={}&limit=100", external_id),
    )
    .await
    else {
        report.failed += 1;
        return report;
    };

    let linked: Vec<&str> = existing.iter().map(|link| link.amenity.key()).collect();

    for amenity in REFERENCE_AMENITIES {
        if linked.contains(amenity) {
            report.skipped += 1;
            continue;
        }

        let payload = AmenityLinkPayload {
            property: external_id.to_string(),
            amenity: amenity.to_string(),
            count: 1,
        };
        match api.post_json("/property-amenities/", &payload).await {
            Ok(created) => report.record_created(created),
            Err(e) => {
                warn!(%external_id, %amenity, error = %e, "Failed to link amenity");
                report.failed += 1;
            }
        }
    }

    report
}
