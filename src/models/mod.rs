mod element;

pub use element::Element;

use crate::error::DocumentError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Room category as derived from the IELV `type` attribute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoomKind {
    Bedroom,
    Kitchen,
    LivingRoom,
    Other,
}

impl RoomKind {
    /// Case-insensitive substring classification
    pub fn classify(raw_type: &str) -> Self {
        let lowered = raw_type.to_lowercase();
        if lowered.contains("bedroom") {
            RoomKind::Bedroom
        } else if lowered.contains("kitchen") {
            RoomKind::Kitchen
        } else if lowered.contains("living") {
            RoomKind::LivingRoom
        } else {
            RoomKind::Other
        }
    }
}

/// One `<room type=".." index="..">` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub room_type: String,
    pub index: String,
    pub view: Option<String>,
    pub bed_size: Option<String>,
    pub equipment: Option<String>,
    pub equipped_for: Option<String>,
    pub other: Option<String>,
}

impl Room {
    pub fn kind(&self) -> RoomKind {
        RoomKind::classify(&self.room_type)
    }
}

/// One `<period>` of the availability calendar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Period {
    pub status: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Weekly price for one bedroom tier, still in feed format (`"$ 20,000"`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BedroomPrice {
    pub bedrooms: String,
    pub amount: String,
}

/// A named season with its price per bedroom tier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonPrice {
    pub name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub bedroom_prices: Vec<BedroomPrice>,
}

/// Full IELV villa detail document
///
/// Container sections (`locations`, `facilities`, ...) keep one inner list
/// per container element, since the description groups entries that way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Villa {
    pub id: String,
    pub title: String,
    pub description: String,
    pub bathrooms: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub locations: Vec<Vec<String>>,
    /// Descriptions of the pools in the first `<pools>` container
    pub pools: Vec<String>,
    pub facilities: Vec<Vec<String>>,
    pub services: Vec<Vec<String>>,
    pub restrictions: Vec<Vec<String>>,
    pub rooms: Vec<Room>,
    pub availability: Vec<Period>,
    pub prices: Vec<SeasonPrice>,
    pub photos: Vec<String>,
}

impl Villa {
    /// Validate a parsed `<villa>` element into a typed document
    pub fn from_element(villa: &Element) -> Result<Self, DocumentError> {
        let id = villa.required_child("id")?.text.trim().to_string();
        if id.is_empty() {
            return Err(DocumentError::MissingField("id"));
        }

        let pools = match villa.children_named("pools").next() {
            Some(container) => container
                .children_named("pool")
                .map(|pool| pool.optional_text("description"))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let rooms = match villa.optional_child("rooms")? {
            Some(rooms) => rooms
                .children_named("room")
                .map(parse_room)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let availability = match villa.optional_child("availability")? {
            Some(calendar) => calendar
                .children_named("period")
                .map(parse_period)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let prices = match villa.optional_child("prices")? {
            Some(prices) => prices
                .children_named("price")
                .map(parse_season)
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        let photos = match villa.optional_child("photos")? {
            Some(photos) => photos
                .texts("photo")
                .into_iter()
                .filter(|url| !url.is_empty())
                .collect(),
            None => Vec::new(),
        };

        Ok(Villa {
            id,
            title: villa.required_child("title")?.text.clone(),
            description: villa.optional_text("description")?,
            bathrooms: non_empty(villa.optional_text("bathrooms")?),
            latitude: non_empty(villa.optional_text("latitude")?),
            longitude: non_empty(villa.optional_text("longitude")?),
            locations: sections(villa, "locations", "location"),
            pools,
            facilities: sections(villa, "facilities", "facility"),
            services: sections(villa, "services", "service"),
            restrictions: sections(villa, "restrictions", "restriction"),
            rooms,
            availability,
            prices,
            photos,
        })
    }

    /// Source ids of every `<villa>` summary in a listing document
    pub fn ids_from_listing(xml: &str) -> Result<Vec<String>, DocumentError> {
        let root = Element::parse(xml)?;
        root.children_named("villa")
            .map(|villa| Ok(villa.required_child("id")?.text.trim().to_string()))
            .collect()
    }

    /// The single `<villa>` of a detail document
    pub fn from_document(xml: &str) -> Result<Self, DocumentError> {
        let root = Element::parse(xml)?;
        Self::from_element(root.required_child("villa")?)
    }

    /// Stable join key in the destination system
    pub fn external_id(&self) -> String {
        external_id(&self.id)
    }

    pub fn rooms_of(&self, kind: RoomKind) -> Vec<&Room> {
        self.rooms.iter().filter(|room| room.kind() == kind).collect()
    }
}

pub fn external_id(source_id: &str) -> String {
    format!("IELV_{}", source_id)
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn sections(villa: &Element, container: &str, entry: &str) -> Vec<Vec<String>> {
    villa
        .children_named(container)
        .map(|section| section.texts(entry))
        .collect()
}

fn parse_room(room: &Element) -> Result<Room, DocumentError> {
    Ok(Room {
        room_type: room.attr("type").unwrap_or_default().to_string(),
        index: room.attr("index").unwrap_or_default().to_string(),
        view: non_empty(room.optional_text("view")?),
        bed_size: non_empty(room.optional_text("bed_size")?),
        equipment: non_empty(room.optional_text("equipment")?),
        equipped_for: non_empty(room.optional_text("equipped_for")?),
        other: non_empty(room.optional_text("other")?),
    })
}

fn parse_date(element: &Element, attr: &'static str) -> Result<NaiveDate, DocumentError> {
    let raw = element
        .attr(attr)
        .ok_or(DocumentError::MissingField(attr))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DocumentError::InvalidValue {
        field: attr,
        value: raw.to_string(),
    })
}

fn parse_period(period: &Element) -> Result<Period, DocumentError> {
    Ok(Period {
        status: period.optional_text("status")?,
        from: parse_date(period, "from")?,
        to: parse_date(period, "to")?,
    })
}

fn parse_season(price: &Element) -> Result<SeasonPrice, DocumentError> {
    Ok(SeasonPrice {
        name: price.attr("name").unwrap_or_default().to_string(),
        from: parse_date(price, "from")?,
        to: parse_date(price, "to")?,
        bedroom_prices: price
            .children_named("bedroom_count")
            .map(|tier| BedroomPrice {
                bedrooms: tier.attr("bedroom").unwrap_or_default().to_string(),
                amount: tier.text.clone(),
            })
            .collect(),
    })
}
