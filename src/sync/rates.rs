use crate::models::SeasonPrice;
use crate::myvr::resources::{ExistingRate, RatePayload};
use crate::myvr::{MyVrApi, MyVrApiExt};
use crate::sync::parse::{nightly_from_weekly, parse_price_cents, seasonal_minimum, sort_rates};
use crate::sync::{fetch_existing, StepReport};
use tracing::{error, warn};

const BASE_RATE_MIN_STAY: u32 = 5;

fn base_rate(external_id: &str, lowest_weekly_cents: i64) -> RatePayload {
    let nightly = nightly_from_weekly(lowest_weekly_cents);
    RatePayload {
        property: external_id.to_string(),
        base_rate: true,
        name: None,
        start_date: None,
        end_date: None,
        min_stay: BASE_RATE_MIN_STAY,
        repeat: false,
        nightly,
        weekend_night: nightly,
    }
}

/// Seasonal rate priced from the largest bedroom tier of the season
fn season_rate(external_id: &str, season: &SeasonPrice) -> Option<RatePayload> {
    let Some(top_tier) = season.bedroom_prices.last() else {
        warn!(%external_id, season = %season.name, "Skipping season without bedroom prices");
        return None;
    };
    let weekly = match parse_price_cents(&top_tier.amount) {
        Ok(cents) => cents,
        Err(e) => {
            warn!(%external_id, season = %season.name, error = %e, "Skipping season");
            return None;
        }
    };
    let nightly = nightly_from_weekly(weekly);

    Some(RatePayload {
        property: external_id.to_string(),
        base_rate: false,
        name: Some(season.name.clone()),
        start_date: Some(season.from),
        end_date: Some(season.to),
        min_stay: seasonal_minimum(&season.name),
        repeat: false,
        nightly,
        weekend_night: nightly,
    })
}

/// Replace all rates of the property: one base rate plus one per season.
/// The base rate is created, and awaited, before the seasonal rates.
pub async fn sync_rates(api: &dyn MyVrApi, external_id: &str, prices: &[SeasonPrice]) -> StepReport {
    let mut report = StepReport::default();

    if prices.is_empty() {
        warn!(%external_id, "No prices in feed, leaving rates untouched");
        report.skipped += 1;
        return report;
    }

    let mut payloads = Vec::with_capacity(prices.len() + 1);
    match sort_rates(prices) {
        Ok(sorted) => {
            if let Some(lowest) = sorted.first() {
                payloads.push(base_rate(external_id, *lowest));
            }
        }
        Err(e) => {
            error!(%external_id, error = %e, "Cannot derive base rate");
            report.failed += 1;
        }
    }
    for season in prices {
        match season_rate(external_id, season) {
            Some(payload) => payloads.push(payload),
            None => report.failed += 1,
        }
    }

    if payloads.is_empty() {
        warn!(%external_id, "No usable prices in feed, leaving rates untouched");
        return report;
    }

    let Some(existing) =
        fetch_existing::<ExistingRate>(api, &format!("/rates/?property={}", external_id)).await
    else {
        report.failed += 1;
        return report;
    };

    for rate in &existing {
        let path = format!("/rates/{}/", rate.key);
        match api.delete(&path).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(%external_id, %path, error = %e, "Failed to delete rate");
                report.failed += 1;
            }
        }
    }

    for payload in &payloads {
        match api.post_json("/rates/", payload).await {
            Ok(created) => report.record_created(created),
            Err(e) => {
                warn!(%external_id, name = ?payload.name, error = %e, "Failed to create rate");
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Villa;
    use crate::testing::FakeMyVr;
    use serde_json::json;

    const VILLA_XML: &str = include_str!("fixtures/villa.xml");

    fn prices() -> Vec<SeasonPrice> {
        Villa::from_document(VILLA_XML).unwrap().prices
    }

    #[tokio::test]
    async fn test_base_rate_created_first_from_lowest_price() {
        let api = FakeMyVr::new();

        let report = sync_rates(&api, "IELV_1234", &prices()).await;

        assert_eq!(report.created.len(), 4);
        let base = &report.created[0];
        assert_eq!(base["baseRate"], true);
        assert_eq!(base["minStay"], 5);
        assert_eq!(base["nightly"], 285_714);
        assert!(base.get("startDate").is_none());
    }

    #[tokio::test]
    async fn test_season_rates_use_top_tier_and_minimum_stay() {
        let api = FakeMyVr::new();

        let report = sync_rates(&api, "IELV_1234", &prices()).await;
        let seasons: Vec<_> = report.created[1..]
            .iter()
            .map(|rate| {
                (
                    rate["name"].as_str().unwrap().to_string(),
                    rate["minStay"].as_u64().unwrap(),
                    rate["nightly"].as_i64().unwrap(),
                    rate["startDate"].as_str().unwrap().to_string(),
                )
            })
            .collect();

        assert_eq!(
            seasons,
            vec![
                ("Low Season 2019".to_string(), 5, 357_143, "2019-04-16".to_string()),
                ("High Season 2019".to_string(), 7, 500_000, "2019-01-06".to_string()),
                ("High Season 2020".to_string(), 7, 500_000, "2020-01-11".to_string()),
            ]
        );
        assert!(report.created[1..].iter().all(|rate| rate["baseRate"] == false));
    }

    #[tokio::test]
    async fn test_existing_rates_are_replaced() {
        let api = FakeMyVr::new();
        api.seed("rates", json!({ "property": "IELV_1234", "nightly": 1 }));
        api.seed("rates", json!({ "property": "IELV_1234", "nightly": 2 }));

        let report = sync_rates(&api, "IELV_1234", &prices()).await;

        assert_eq!(report.deleted, 2);
        assert_eq!(api.collection("rates").len(), 4);
        assert!(api
            .collection("rates")
            .iter()
            .all(|rate| rate["nightly"] != 1 && rate["nightly"] != 2));
    }

    #[tokio::test]
    async fn test_no_prices_leaves_rates_untouched() {
        let api = FakeMyVr::new();
        api.seed("rates", json!({ "property": "IELV_1234", "nightly": 1 }));

        let report = sync_rates(&api, "IELV_1234", &[]).await;

        assert_eq!(report.skipped, 1);
        assert_eq!(api.collection("rates").len(), 1);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_price_skips_only_that_rate() {
        let api = FakeMyVr::new();
        let mut prices = prices();
        prices[0].bedroom_prices.last_mut().unwrap().amount = "on request".to_string();

        let report = sync_rates(&api, "IELV_1234", &prices).await;

        // no base rate, Low Season skipped
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.failed, 2);
        assert!(report.created.iter().all(|rate| rate["baseRate"] == false));
    }

    #[tokio::test]
    async fn test_no_usable_price_keeps_existing_rates() {
        let api = FakeMyVr::new();
        api.seed("rates", json!({ "property": "IELV_1234", "nightly": 1 }));
        api.seed("rates", json!({ "property": "IELV_1234", "nightly": 2 }));
        let mut prices = prices();
        for season in &mut prices {
            for tier in &mut season.bedroom_prices {
                tier.amount = "on request".to_string();
            }
        }

        let report = sync_rates(&api, "IELV_1234", &prices).await;

        assert_eq!(report.deleted, 0);
        assert!(report.created.is_empty());
        assert_eq!(report.failed, 1 + prices.len());
        assert_eq!(api.collection("rates").len(), 2);
        assert_eq!(api.count("DELETE", "/rates/"), 0);
    }

    #[tokio::test]
    async fn test_season_without_tiers_is_counted() {
        let api = FakeMyVr::new();
        let mut prices = prices();
        prices[0].bedroom_prices.clear();

        let report = sync_rates(&api, "IELV_1234", &prices).await;

        assert_eq!(report.failed, 1);
        // base rate from the remaining seasons plus two seasonal rates
        assert_eq!(report.created.len(), 3);
    }
}
