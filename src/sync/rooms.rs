use crate::models::Room;
use crate::myvr::resources::{Bed, ExistingRoom, RoomPayload};
use crate::myvr::{MyVrApi, MyVrApiExt};
use crate::sync::parse::parse_bed_size;
use crate::sync::{fetch_existing, StepReport};
use tracing::{debug, warn};

/// MyVR room type of every room this sync creates and replaces
pub const BEDROOM_TYPE: &str = "bedroom";

fn room_payload(external_id: &str, room: &Room) -> RoomPayload {
    RoomPayload {
        property: external_id.to_string(),
        room_type: BEDROOM_TYPE.to_string(),
        beds: vec![Bed {
            size: parse_bed_size(room.bed_size.as_deref().unwrap_or_default()),
            bed_type: "standard".to_string(),
            mattress: "box".to_string(),
        }],
    }
}

/// Replace every MyVR bedroom of the property with the IELV bedrooms.
/// All deletes finish before the first create.
pub async fn sync_bedrooms(api: &dyn MyVrApi, external_id: &str, bedrooms: &[&Room]) -> StepReport {
    let mut report = StepReport::default();

    let Some(existing) =
        fetch_existing::<ExistingRoom>(api, &format!("/rooms/?property={}", external_id)).await
    else {
        report.failed += 1;
        return report;
    };

    for room in existing.iter().filter(|room| room.room_type == BEDROOM_TYPE) {
        let path = format!("/rooms/{}/", room.key);
        match api.delete(&path).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(%external_id, %path, error = %e, "Failed to delete room");
                report.failed += 1;
            }
        }
    }

    for room in bedrooms {
        let payload = room_payload(external_id, room);
        debug!(%external_id, size = ?payload.beds[0].size, "Creating bedroom");
        match api.post_json("/rooms/", &payload).await {
            Ok(created) => report.record_created(created),
            Err(e) => {
                warn!(%external_id, error = %e, "Failed to create room");
                report.failed += 1;
            }
        }
    }

    report
}
