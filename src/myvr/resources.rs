//! MyVR resource shapes: list responses we read and payloads we send

use crate::sync::parse::{BedSize, CalendarStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One page of a list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// A reference that MyVR renders either as a bare key or as a nested object
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KeyRef {
    Key(String),
    Object { key: String },
}

impl KeyRef {
    pub fn key(&self) -> &str {
        match self {
            KeyRef::Key(key) => key,
            KeyRef::Object { key } => key,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistingRoom {
    pub key: String,
    #[serde(rename = "type", default)]
    pub room_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistingRate {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistingFee {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistingCalendarEvent {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingPhoto {
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistingMembership {
    pub group: KeyRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistingAmenityLink {
    pub amenity: KeyRef,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPayload {
    pub name: String,
    pub short_code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    pub lat: String,
    pub lon: String,
    pub address_one: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub postal_code: String,
    pub country_code: String,
    pub accommodates: u32,
    pub external_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bed {
    pub size: BedSize,
    #[serde(rename = "type")]
    pub bed_type: String,
    pub mattress: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoomPayload {
    pub property: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub beds: Vec<Bed>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatePayload {
    pub property: String,
    pub base_rate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub min_stay: u32,
    pub repeat: bool,
    pub nightly: i64,
    pub weekend_night: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeePayload {
    pub property: String,
    pub name: String,
    #[serde(rename = "type")]
    pub fee_type: String,
    pub basis: String,
    pub currency: String,
    pub percentage: String,
    pub included: bool,
    pub optional: bool,
    pub refundable: bool,
    pub taxable: bool,
    pub position: u32,
    pub guest_threshold: u32,
    pub include_children: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventPayload {
    pub property: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: CalendarStatus,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPayload {
    pub property: String,
    pub source_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MembershipPayload {
    pub group: String,
    pub property: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AmenityLinkPayload {
    pub property: String,
    pub amenity: String,
    pub count: u32,
}
