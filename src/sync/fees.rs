use crate::myvr::resources::{ExistingFee, FeePayload};
use crate::myvr::{MyVrApi, MyVrApiExt};
use crate::sync::{fetch_existing, StepReport};
use tracing::warn;

pub const TAX: &str = "Tax";
pub const SERVICE_CHARGE: &str = "Service Charge";

/// 5% tourism tax, included in the rent
pub fn tax_payload(external_id: &str) -> FeePayload {
    FeePayload {
        property: external_id.to_string(),
        name: TAX.to_string(),
        fee_type: "tax".to_string(),
        basis: "rent-percentage".to_string(),
        currency: "USD".to_string(),
        percentage: "5.000".to_string(),
        included: true,
        optional: false,
        refundable: false,
        taxable: false,
        position: 1,
        guest_threshold: 0,
        include_children: false,
        locked: false,
    }
}

/// 10% service charge, itself taxable
pub fn service_charge_payload(external_id: &str) -> FeePayload {
    FeePayload {
        property: external_id.to_string(),
        name: SERVICE_CHARGE.to_string(),
        fee_type: "fee".to_string(),
        basis: "rent-percentage".to_string(),
        currency: "USD".to_string(),
        percentage: "10.000".to_string(),
        included: true,
        optional: false,
        refundable: false,
        taxable: true,
        position: 0,
        guest_threshold: 0,
        include_children: false,
        locked: false,
    }
}

/// Update the standard fees in place, creating whichever is missing
pub async fn sync_fees(api: &dyn MyVrApi, external_id: &str) -> StepReport {
    let mut report = StepReport::default();

    let Some(existing) =
        fetch_existing::<ExistingFee>(api, &format!("/fees/?property={}", external_id)).await
    else {
        report.failed += 1;
        return report;
    };

    for payload in [tax_payload(external_id), service_charge_payload(external_id)] {
        let current = existing.iter().find(|fee| fee.name == payload.name);
        let result = match current {
            Some(fee) => api
                .put_json(&format!("/fees/{}/", fee.key), &payload)
                .await
                .map(|_| report.updated += 1),
            None => api
                .post_json("/fees/", &payload)
                .await
                .map(|created| report.record_created(created)),
        };

        if let Err(e) = result {
            warn!(%external_id, fee = %payload.name, error = %e, "Failed to set fee");
            report.failed += 1;
        }
    }

    report
}
