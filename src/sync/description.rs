//! HTML listing description assembled from the villa sub-documents

use crate::models::{Room, RoomKind, Villa};

const BOOK_WITH_US_HTML: &str = "<div><b>WHY BOOK YOUR STAY WITH US?&nbsp;</b></div><div><b><br></b><ul><li>Private check-in </li><li>Pre-trip planning: airport transfers, grocery pre-stocking, activity suggestions</li><li>Fresh Linens, Towels, Daily Housekeeping (except Sundays)&nbsp;</li><li>English speaking concierge service and on location team </li><li>Free Wifi</li><li>Points Program (Inquire about our PersonalVillas rewards program if you visit often!)</li></ul></div><div><strong><br></strong></div>";

const KITCHEN_HEADER: &str = "<div><br></div><div><b>Kitchen&nbsp;</b></div>";
const LIVING_ROOM_HEADER: &str = "<div><strong>Living room</strong></div>";

/// Everything the description is built from
#[derive(Debug, Default)]
pub struct DescriptionInput<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub locations: &'a [Vec<String>],
    pub pools: &'a [String],
    pub facilities: &'a [Vec<String>],
    pub services: &'a [Vec<String>],
    pub restrictions: &'a [Vec<String>],
    pub bedrooms: Vec<&'a Room>,
    pub kitchen: Vec<&'a Room>,
    pub living_room: Vec<&'a Room>,
}

impl<'a> DescriptionInput<'a> {
    pub fn from_villa(villa: &'a Villa) -> Self {
        Self {
            name: &villa.title,
            description: &villa.description,
            locations: &villa.locations,
            pools: &villa.pools,
            facilities: &villa.facilities,
            services: &villa.services,
            restrictions: &villa.restrictions,
            bedrooms: villa.rooms_of(RoomKind::Bedroom),
            kitchen: villa.rooms_of(RoomKind::Kitchen),
            living_room: villa.rooms_of(RoomKind::LivingRoom),
        }
    }
}

/// Compose the description in its fixed section order
pub fn build_description(input: &DescriptionInput<'_>) -> String {
    let mut html = String::new();

    html.push('\n');
    html.push_str(BOOK_WITH_US_HTML);
    html.push_str("\n\n");
    html.push_str(&name_and_location(input.name, input.locations));
    html.push_str("\n\n<div><br></div>\n\n");
    html.push_str(&format!("<div>{}</div>\n\n", input.description));

    html.push_str("<div><br></div><div><b>AMENITIES:&nbsp;</b></div><div>\n");
    html.push_str(&joined_sections(input.facilities));
    html.push('\n');
    html.push_str(&joined_sections(input.services));
    html.push_str("\n</div>\n\n");

    html.push_str(&pools_html(input.pools));
    html.push_str("\n\n<div><br></div><div><b>BEDROOMS:&nbsp;</b></div>\n");
    html.push_str(&rooms_html(&input.bedrooms, None, false));
    html.push_str("\n\n");
    html.push_str(&rooms_html(&input.kitchen, Some(KITCHEN_HEADER), false));
    html.push_str("\n\n");
    html.push_str(&bulleted_sections(input.restrictions, "Restriction"));
    html.push_str("\n\n");
    html.push_str(&rooms_html(&input.living_room, Some(LIVING_ROOM_HEADER), true));
    html.push_str("\n\n<div><b>Location</b><br>\n");
    html.push_str(&joined_sections(input.locations));
    html.push_str("\n\n");

    html
}

fn name_and_location(name: &str, locations: &[Vec<String>]) -> String {
    let name = if name.is_empty() {
        String::new()
    } else {
        format!("{},", name)
    };
    let primary = locations
        .first()
        .and_then(|section| section.first())
        .map(String::as_str)
        .unwrap_or_default();

    format!("\n<div>\n<b>{}</b>\n<strong> </strong>\n{}&nbsp;\n</div>\n", name, primary)
}

/// Each container joined with `<br>`, containers concatenated
fn joined_sections(sections: &[Vec<String>]) -> String {
    let body: String = sections.iter().map(|section| section.join("<br>")).collect();
    format!("\n{}\n", body)
}

fn bulleted_sections(sections: &[Vec<String>], title: &str) -> String {
    let any = !sections.is_empty();
    let items = sections
        .iter()
        .map(|section| section.join("</li><li>"))
        .collect::<Vec<_>>()
        .join("</li><li>");

    let mut html = String::from("\n");
    if any {
        html.push_str(&format!("<br/><div><strong>{}</strong></div>", title));
    }
    html.push_str("\n<div>\n<ul>");
    if any {
        html.push_str("<li>");
    }
    html.push('\n');
    html.push_str(&items);
    html.push('\n');
    if any {
        html.push_str("</li>");
    }
    html.push_str("</ul>\n</div>\n");
    html
}

fn pools_html(pools: &[String]) -> String {
    let described: Vec<&str> = pools
        .iter()
        .map(String::as_str)
        .filter(|text| !text.is_empty())
        .collect();

    if described.is_empty() {
        return String::new();
    }

    format!("<div>Pools</div>\n<div>\n{}\n</div>\n", described.join("<br>"))
}

/// The first room of a type is shown without a number
fn room_heading(room: &Room) -> String {
    let index = if room.index == "1" { "" } else { room.index.as_str() };
    format!("{} {}<br>", room.room_type, index)
}

/// `* Safe  * Hair dryer` -> ` Safe, Hair dryer`
fn clean_other(other: &str) -> String {
    let flattened = other.replace('\n', " ");
    let collapsed = replace_whitespace_star(&flattened, 2);
    let collapsed = replace_whitespace_star(&collapsed, 1);
    collapsed.replace('*', "")
}

/// Replace every `width` whitespace characters followed by `*` with a comma
fn replace_whitespace_star(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let end = i + width;
        let matches = end < chars.len()
            && chars[i..end].iter().all(|c| c.is_whitespace())
            && chars[end] == '*';
        if matches {
            out.push(',');
            i = end + 1;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

fn rooms_html(rooms: &[&Room], header: Option<&str>, list: bool) -> String {
    let mut html = String::new();

    for room in rooms {
        html.push('\n');
        match header {
            Some(header) => html.push_str(header),
            None => html.push_str(&room_heading(room)),
        }
        html.push('\n');
        if list {
            html.push_str("<ul>\n");
        }

        let fields = [
            ("view", room.view.clone()),
            ("bed_size", room.bed_size.clone()),
            ("equipped_for", room.equipped_for.clone()),
            ("equipment", room.equipment.clone()),
            ("other", room.other.as_deref().map(clean_other)),
        ];
        for (label, value) in fields {
            let Some(value) = value else { continue };
            html.push('\n');
            if list {
                html.push_str("<li>");
            }
            html.push_str(&format!("{}: {}<br>", label, value));
            if list {
                html.push_str("</li>");
            }
            html.push('\n');
        }

        if list {
            html.push_str("</ul>\n");
        }
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    const VILLA_XML: &str = include_str!("fixtures/villa.xml");
    const EXPECTED_HTML: &str = include_str!("fixtures/description.html");

    /// Collapse whitespace and drop it around tags
    fn normalize(html: &str) -> String {
        let collapsed = html.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.replace(" <", "<").replace("> ", ">")
    }

    fn fixture_description() -> String {
        let villa = Villa::from_document(VILLA_XML).unwrap();
        build_description(&DescriptionInput::from_villa(&villa))
    }

    #[test]
    fn test_matches_golden_description() {
        assert_eq!(
            normalize(fixture_description().trim()),
            normalize(EXPECTED_HTML.trim())
        );
    }

    #[test]
    fn test_contains_every_source_value() {
        let villa = Villa::from_document(VILLA_XML).unwrap();
        let built = fixture_description();

        assert!(built.contains(&villa.description));
        for location in villa.locations.iter().flatten() {
            assert!(built.contains(location.as_str()));
        }
        for entry in villa
            .facilities
            .iter()
            .chain(&villa.services)
            .chain(&villa.restrictions)
            .flatten()
        {
            assert!(built.contains(entry.as_str()), "missing {}", entry);
        }
        for pool in villa.pools.iter().filter(|p| !p.is_empty()) {
            assert!(built.contains(pool.as_str()));
        }
        for room in &villa.rooms {
            for value in [&room.view, &room.bed_size, &room.equipment, &room.equipped_for]
                .into_iter()
                .flatten()
            {
                assert!(built.contains(value.as_str()), "missing {}", value);
            }
        }
    }

    #[test]
    fn test_sections_parse_as_html() {
        let document = Html::parse_fragment(&fixture_description());

        let bold = Selector::parse("b").unwrap();
        let headings: Vec<String> = document
            .select(&bold)
            .map(|b| b.text().collect::<String>())
            .collect();
        assert!(headings.iter().any(|h| h.starts_with("AMENITIES")));
        assert!(headings.iter().any(|h| h.starts_with("BEDROOMS")));
        assert!(headings.iter().any(|h| h == "Villa Mock,"));

        let items = Selector::parse("li").unwrap();
        let bullets: Vec<String> = document
            .select(&items)
            .map(|li| li.text().collect::<String>().trim().to_string())
            .collect();
        assert!(bullets.contains(&"No smoking".to_string()));
        assert!(bullets.contains(&"No pets".to_string()));
        assert!(bullets.contains(&"view: Pool".to_string()));
    }

    #[test]
    fn test_pools_section_skipped_without_descriptions() {
        assert_eq!(pools_html(&[String::new(), String::new()]), "");
        assert!(pools_html(&["Lap pool".to_string()]).contains("Lap pool"));
    }

    #[test]
    fn test_first_room_heading_is_unnumbered() {
        let mut room = Room {
            room_type: "Bedroom".to_string(),
            index: "1".to_string(),
            view: None,
            bed_size: None,
            equipment: None,
            equipped_for: None,
            other: None,
        };
        assert_eq!(room_heading(&room), "Bedroom <br>");
        room.index = "2".to_string();
        assert_eq!(room_heading(&room), "Bedroom 2<br>");
    }

    #[test]
    fn test_clean_other_turns_asterisks_into_commas() {
        assert_eq!(
            clean_other("* Safe  * Hair dryer\n* Walk-in closet"),
            " Safe, Hair dryer, Walk-in closet"
        );
        assert_eq!(clean_other("No markup"), "No markup");
    }

    #[test]
    fn test_empty_input_still_has_fixed_sections() {
        let built = build_description(&DescriptionInput::default());
        assert!(built.contains("WHY BOOK YOUR STAY WITH US?"));
        assert!(built.contains("BEDROOMS:"));
        assert!(!built.contains("Pools"));
        assert!(!built.contains("Restriction"));
    }
}
