//! Field parsers mapping free-text IELV values onto MyVR values

use crate::error::ParseError;
use crate::models::SeasonPrice;
use serde::{Deserialize, Serialize};

/// Bed sizes accepted by MyVR
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BedSize {
    King,
    Queen,
    Twin,
    Full,
    Crib,
    Other,
}

/// Calendar event status; only reserved periods are synced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CalendarStatus {
    Reserved,
}

/// Fallback coordinates used when the feed omits lat/lon
pub const FALLBACK_LATITUDE: &str = "17.8987771";
pub const FALLBACK_LONGITUDE: &str = "-62.8331287";

/// Classify a bed description. First match wins: king, full, queen, twin, crib.
pub fn parse_bed_size(raw: &str) -> BedSize {
    let lowered = raw.to_lowercase();
    [
        ("king", BedSize::King),
        ("full", BedSize::Full),
        ("queen", BedSize::Queen),
        ("twin", BedSize::Twin),
        ("crib", BedSize::Crib),
    ]
    .into_iter()
    .find(|(word, _)| lowered.contains(word))
    .map(|(_, size)| size)
    .unwrap_or(BedSize::Other)
}

pub fn parse_availability_status(status: &str) -> Option<CalendarStatus> {
    if status.eq_ignore_ascii_case("reserved") {
        Some(CalendarStatus::Reserved)
    } else {
        None
    }
}

/// Minimum nights for a season, keyed on its display name
pub fn seasonal_minimum(rate_name: &str) -> u32 {
    let lowered = rate_name.to_lowercase();
    if lowered.contains("high") {
        7
    } else if lowered.contains("low") {
        5
    } else {
        14
    }
}

/// Keep at most 10 characters per `.`-separated part, then 14 overall
pub fn format_lat_lon(raw: &str) -> String {
    let joined = raw
        .split('.')
        .map(|part| part.chars().take(10).collect::<String>())
        .collect::<Vec<_>>()
        .join(".");
    joined.chars().take(14).collect()
}

/// `"$ 20,000"` -> 2_000_000 cents
pub fn parse_price_cents(raw: &str) -> Result<i64, ParseError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    let dollars: f64 = cleaned
        .parse()
        .map_err(|_| ParseError(raw.to_string()))?;
    if !dollars.is_finite() || dollars < 0.0 {
        return Err(ParseError(raw.to_string()));
    }

    Ok((dollars * 100.0).round() as i64)
}

/// Every bedroom-tier price of every season, in cents, ascending
pub fn sort_rates(prices: &[SeasonPrice]) -> Result<Vec<i64>, ParseError> {
    let mut cents = prices
        .iter()
        .flat_map(|season| season.bedroom_prices.iter())
        .map(|tier| parse_price_cents(&tier.amount))
        .collect::<Result<Vec<_>, _>>()?;
    cents.sort_unstable();
    Ok(cents)
}

/// Weekly cents to a rounded nightly amount
pub fn nightly_from_weekly(weekly_cents: i64) -> i64 {
    (weekly_cents as f64 / 7.0).round() as i64
}
