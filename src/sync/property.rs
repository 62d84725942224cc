use crate::error::ApiError;
use crate::models::{RoomKind, Villa};
use crate::myvr::resources::PropertyPayload;
use crate::myvr::{Lookup, MyVrApi, MyVrApiExt};
use crate::sync::description::{build_description, DescriptionInput};
use crate::sync::parse::{format_lat_lon, FALLBACK_LATITUDE, FALLBACK_LONGITUDE};
use serde_json::Value;
use tracing::{debug, warn};

const POSTAL_CODE: &str = "97700";
const COUNTRY_CODE: &str = "BL";

/// Which branch the upsert took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

pub async fn get_property(api: &dyn MyVrApi, external_id: &str) -> Result<Lookup<Value>, ApiError> {
    api.lookup(&format!("/properties/{}/", external_id)).await
}

pub async fn put_property(api: &dyn MyVrApi, payload: &PropertyPayload) -> Result<Value, ApiError> {
    api.put_json(&format!("/properties/{}/", payload.external_id), payload)
        .await
}

pub async fn post_property(api: &dyn MyVrApi, payload: &PropertyPayload) -> Result<Value, ApiError> {
    api.post_json("/properties/", payload).await
}

/// Desired MyVR property fields for a villa
pub fn property_payload(villa: &Villa) -> PropertyPayload {
    let bedrooms = villa.rooms_of(RoomKind::Bedroom).len() as u32;

    let bathrooms = villa.bathrooms.as_deref().and_then(|raw| match raw.parse::<f64>() {
        Ok(count) => Some(count),
        Err(_) => {
            warn!(id = %villa.id, bathrooms = %raw, "Ignoring unparseable bathroom count");
            None
        }
    });

    let lat = villa
        .latitude
        .as_deref()
        .map(format_lat_lon)
        .unwrap_or_else(|| FALLBACK_LATITUDE.to_string());
    let lon = villa
        .longitude
        .as_deref()
        .map(format_lat_lon)
        .unwrap_or_else(|| FALLBACK_LONGITUDE.to_string());

    let city = villa
        .locations
        .first()
        .and_then(|section| section.first())
        .cloned();

    PropertyPayload {
        name: villa.title.clone(),
        short_code: short_code(&villa.id),
        description: build_description(&DescriptionInput::from_villa(villa)),
        bathrooms,
        lat,
        lon,
        address_one: villa.title.clone(),
        city,
        postal_code: POSTAL_CODE.to_string(),
        country_code: COUNTRY_CODE.to_string(),
        accommodates: bedrooms * 2,
        external_id: villa.external_id(),
    }
}

/// `II` followed by the last three characters of the source id
fn short_code(source_id: &str) -> String {
    let chars: Vec<char> = source_id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(3)..].iter().collect();
    format!("II{}", tail)
}

/// Create the property when MyVR does not know it, otherwise update it
pub async fn upsert_property(api: &dyn MyVrApi, villa: &Villa) -> Result<Upsert, ApiError> {
    let payload = property_payload(villa);

    match get_property(api, &payload.external_id).await? {
        Lookup::NotFound => {
            debug!(external_id = %payload.external_id, "Creating property");
            post_property(api, &payload).await?;
            Ok(Upsert::Created)
        }
        Lookup::Found(_) => {
            debug!(external_id = %payload.external_id, "Updating property");
            put_property(api, &payload).await?;
            Ok(Upsert::Updated)
        }
    }
}
