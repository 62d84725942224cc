use crate::models::Period;
use crate::myvr::resources::{CalendarEventPayload, ExistingCalendarEvent};
use crate::myvr::{MyVrApi, MyVrApiExt};
use crate::sync::parse::parse_availability_status;
use crate::sync::{fetch_existing, StepReport};
use tracing::warn;

/// Title marking calendar events owned by this sync
pub const EVENT_TITLE: &str = "IELV";

/// Replace the IELV-owned calendar events with the reserved periods of
/// the feed. Events created by anyone else are never touched.
pub async fn sync_calendar(api: &dyn MyVrApi, external_id: &str, periods: &[Period]) -> StepReport {
    let mut report = StepReport::default();

    let Some(existing) = fetch_existing::<ExistingCalendarEvent>(
        api,
        &format!("/calendar-events/?property={}&limit=200", external_id),
    )
    .await
    else {
        report.failed += 1;
        return report;
    };

    for event in existing
        .iter()
        .filter(|event| event.title.as_deref() == Some(EVENT_TITLE))
    {
        let path = format!("/calendar-events/{}/", event.key);
        match api.delete(&path).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(%external_id, %path, error = %e, "Failed to delete calendar event");
                report.failed += 1;
            }
        }
    }

    for period in periods {
        let Some(status) = parse_availability_status(&period.status) else {
            report.skipped += 1;
            continue;
        };

        let payload = CalendarEventPayload {
            property: external_id.to_string(),
            start_date: period.from,
            end_date: period.to,
            status,
            title: EVENT_TITLE.to_string(),
        };
        match api.post_json("/calendar-events/", &payload).await {
            Ok(created) => report.record_created(created),
            Err(e) => {
                warn!(%external_id, from = %period.from, to = %period.to, error = %e, "Failed to create calendar event");
                report.failed += 1;
            }
        }
    }

    report
}
