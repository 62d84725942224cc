//! Property reconciliation: field parsing, description building, one
//! synchronizer per MyVR resource type and the orchestrating `Reconciler`.

pub mod amenities;
pub mod calendar;
pub mod description;
pub mod fees;
pub mod groups;
pub mod parse;
pub mod photos;
pub mod property;
pub mod rates;
pub mod rooms;

use crate::error::SyncError;
use crate::models::{RoomKind, Villa};
use crate::myvr::resources::Page;
use crate::myvr::{Lookup, MyVrApi, MyVrApiExt};
use futures::future::BoxFuture;
use futures::{stream, FutureExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Settings injected into the reconciler at construction
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Membership groups every synced property belongs to
    pub group_keys: Vec<String>,
    /// How many child-resource steps may run at once (1 = sequential)
    pub concurrency: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            group_keys: Vec::new(),
            concurrency: 1,
        }
    }
}

/// What one synchronizer did to its resource collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub deleted: usize,
    pub created: Vec<Value>,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl StepReport {
    fn record_created(&mut self, response: Value) {
        self.created.push(response);
    }
}

/// Child-resource steps run after the property upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Availability,
    Groups,
    Bedrooms,
    Rates,
    Fees,
    Photos,
    Amenities,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Availability => "availability",
            Step::Groups => "groups",
            Step::Bedrooms => "bedrooms",
            Step::Rates => "rates",
            Step::Fees => "fees",
            Step::Photos => "photos",
            Step::Amenities => "amenities",
        };
        f.write_str(name)
    }
}

/// Fetch the first page of a property-scoped collection.
///
/// A 404 means the collection is empty. Any other failure is logged and
/// returns `None` so the caller can skip the step.
pub(crate) async fn fetch_existing<T: DeserializeOwned + Send>(
    api: &dyn MyVrApi,
    path: &str,
) -> Option<Vec<T>> {
    match api.lookup::<Page<T>>(path).await {
        Ok(Lookup::Found(page)) => Some(page.results),
        Ok(Lookup::NotFound) => Some(Vec::new()),
        Err(e) => {
            error!(%path, error = %e, "Failed to list existing resources");
            None
        }
    }
}

/// Drives one full property synchronization against MyVR
pub struct Reconciler {
    api: Arc<dyn MyVrApi>,
    settings: SyncSettings,
}

impl Reconciler {
    pub fn new(api: Arc<dyn MyVrApi>, settings: SyncSettings) -> Self {
        Self { api, settings }
    }

    /// Upsert the property, then reconcile every child resource.
    ///
    /// Only a failed upsert is an error; child-resource failures are logged
    /// and the remaining steps still run.
    pub async fn synchronize_property(&self, villa: &Villa) -> Result<String, SyncError> {
        let external_id = villa.external_id();
        let api = self.api.as_ref();

        info!(%external_id, "Synchronizing property");

        let upsert = property::upsert_property(api, villa)
            .await
            .map_err(|source| SyncError::Property {
                external_id: external_id.clone(),
                source,
            })?;
        info!(%external_id, ?upsert, "Property upserted");

        let bedrooms = villa.rooms_of(RoomKind::Bedroom);
        let id = external_id.as_str();

        let steps: Vec<BoxFuture<'_, (Step, StepReport)>> = vec![
            async move {
                (
                    Step::Availability,
                    calendar::sync_calendar(api, id, &villa.availability).await,
                )
            }
            .boxed(),
            async move {
                (
                    Step::Groups,
                    groups::sync_groups(api, id, &self.settings.group_keys).await,
                )
            }
            .boxed(),
            async move { (Step::Bedrooms, rooms::sync_bedrooms(api, id, &bedrooms).await) }
                .boxed(),
            async move { (Step::Rates, rates::sync_rates(api, id, &villa.prices).await) }.boxed(),
            async move { (Step::Fees, fees::sync_fees(api, id).await) }.boxed(),
            async move { (Step::Photos, photos::sync_photos(api, id, &villa.photos).await) }
                .boxed(),
            async move { (Step::Amenities, amenities::sync_amenities(api, id).await) }.boxed(),
        ];

        let reports: Vec<(Step, StepReport)> = stream::iter(steps)
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        for (step, report) in &reports {
            log_report(id, *step, report);
        }

        info!(%external_id, "Updates complete");
        Ok(external_id)
    }

    /// Availability-only stage
    pub async fn synchronize_availability(&self, villa: &Villa) -> StepReport {
        let external_id = villa.external_id();
        let report =
            calendar::sync_calendar(self.api.as_ref(), &external_id, &villa.availability).await;
        log_report(&external_id, Step::Availability, &report);
        report
    }

    /// Rates-only stage
    pub async fn synchronize_rates(&self, villa: &Villa) -> StepReport {
        let external_id = villa.external_id();
        let report = rates::sync_rates(self.api.as_ref(), &external_id, &villa.prices).await;
        log_report(&external_id, Step::Rates, &report);
        report
    }
}

fn log_report(external_id: &str, step: Step, report: &StepReport) {
    if report.failed > 0 {
        warn!(
            %external_id,
            %step,
            deleted = report.deleted,
            created = report.created.len(),
            updated = report.updated,
            failed = report.failed,
            "Step finished with failures"
        );
    } else {
        info!(
            %external_id,
            %step,
            deleted = report.deleted,
            created = report.created.len(),
            updated = report.updated,
            skipped = report.skipped,
            "Step finished"
        );
    }
    debug!(%external_id, %step, ?report, "Step report");
}
