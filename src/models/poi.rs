//! Point-of-interest records as read from the dataset and as ranked for export

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::location::Coordinates;
use crate::config::LinksConfig;
use crate::error::KravinkaError;
use crate::Result;

/// One entry of the dataset listing, before validation.
///
/// Every field is optional here so that a single bad entry can be reported
/// as malformed instead of failing the whole listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPoiRecord {
    pub lat: Option<Value>,
    pub lng: Option<Value>,
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub icon: Option<Value>,
}

/// A dataset entry whose required fields have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    pub coordinates: Coordinates,
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl RawPoiRecord {
    /// Decode a raw JSON value; non-object values are malformed
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| KravinkaError::malformed(format!("record is not an object: {e}")))
    }

    /// Check the required fields and parse the coordinates
    pub fn validate(&self) -> Result<PoiRecord> {
        let id = scalar_text("id", self.id.as_ref())?;
        let latitude = parse_coordinate("lat", self.lat.as_ref(), &id)?;
        let longitude = parse_coordinate("lng", self.lng.as_ref(), &id)?;
        let name = scalar_text("name", self.name.as_ref())?;
        let icon = match self.icon.as_ref() {
            Some(Value::String(icon)) => icon.clone(),
            Some(other) => {
                return Err(KravinkaError::malformed(format!(
                    "record {id}: icon must be a string, got {other}"
                )));
            }
            None => {
                return Err(KravinkaError::malformed(format!(
                    "record {id}: missing field `icon`"
                )));
            }
        };

        Ok(PoiRecord {
            coordinates: Coordinates::new(latitude, longitude),
            id,
            name,
            icon,
        })
    }
}

fn scalar_text(field: &str, value: Option<&Value>) -> Result<String> {
    match value {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Bool(flag)) => Ok(flag.to_string()),
        Some(other) => Err(KravinkaError::malformed(format!(
            "field `{field}` must be a scalar, got {other}"
        ))),
        None => Err(KravinkaError::malformed(format!("missing field `{field}`"))),
    }
}

fn parse_coordinate(field: &str, value: Option<&Value>, id: &str) -> Result<f64> {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
        None => {
            return Err(KravinkaError::malformed(format!(
                "record {id}: missing field `{field}`"
            )));
        }
    };

    parsed.filter(|v| v.is_finite()).ok_or_else(|| {
        KravinkaError::malformed(format!(
            "record {id}: field `{field}` is not numeric: {}",
            value.map(ToString::to_string).unwrap_or_default()
        ))
    })
}

/// Basename of an icon path (text after the last `/`), trimmed.
///
/// A path without any `/` is used whole.
#[must_use]
pub fn normalize_icon_token(icon: &str) -> String {
    match icon.rfind('/') {
        Some(idx) => icon[idx + 1..].trim().to_string(),
        None => icon.trim().to_string(),
    }
}

/// A hyperlink attached to a waypoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiLink {
    pub href: String,
    pub text: String,
}

impl PoiLink {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

/// A point of interest accepted by the proximity filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiItem {
    pub coordinates: Coordinates,
    pub id: String,
    pub name: String,
    /// Waypoint label written to the GPX `name` element
    pub caption: String,
    /// Icon file name used by the allow-list
    pub icon_token: String,
    /// Distance to the nearest reference point, over all reference points
    pub min_dist_km: f64,
    pub is_valid: bool,
    /// Detail page first, then the image
    pub links: Vec<PoiLink>,
}

impl PoiItem {
    /// Build the exportable item for a record that passed the distance check
    #[must_use]
    pub fn from_record(
        record: PoiRecord,
        min_dist_km: f64,
        links: &LinksConfig,
        append_detail_link: bool,
    ) -> Self {
        let detail_url = links.detail_url(&record.id);
        let image_url = links.image_url(&record.icon);

        let mut caption = format!(" #{}: {}", record.id, record.name);
        if append_detail_link {
            caption.push_str(", ");
            caption.push_str(&detail_url);
        }

        let links = vec![
            PoiLink::new(detail_url, record.name.clone()),
            PoiLink::new(image_url, format!("Image of {}", record.name)),
        ];

        Self {
            coordinates: record.coordinates,
            icon_token: normalize_icon_token(&record.icon),
            id: record.id,
            name: record.name,
            caption,
            min_dist_km,
            is_valid: true,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> Result<PoiRecord> {
        RawPoiRecord::from_value(value)?.validate()
    }

    #[test]
    fn test_validate_accepts_string_coordinates() {
        let rec = record(json!({
            "lat": "50.0755",
            "lng": "14.4378",
            "id": 42,
            "name": "Mlýn U Tří",
            "icon": "img/icons/1.png"
        }))
        .unwrap();

        assert_eq!(rec.coordinates, Coordinates::new(50.0755, 14.4378));
        assert_eq!(rec.id, "42");
        assert_eq!(rec.name, "Mlýn U Tří");
        assert_eq!(rec.icon, "img/icons/1.png");
    }

    #[test]
    fn test_validate_accepts_numeric_coordinates() {
        let rec = record(json!({
            "lat": 49.5, "lng": 15.25, "id": "7", "name": "Mill", "icon": "1.png"
        }))
        .unwrap();
        assert_eq!(rec.coordinates.latitude, 49.5);
        assert_eq!(rec.coordinates.longitude, 15.25);
    }

    #[rstest]
    #[case(json!({"lng": "14.0", "id": 1, "name": "a", "icon": "1.png"}))]
    #[case(json!({"lat": "north", "lng": "14.0", "id": 1, "name": "a", "icon": "1.png"}))]
    #[case(json!({"lat": "50.0", "lng": null, "id": 1, "name": "a", "icon": "1.png"}))]
    #[case(json!({"lat": "50.0", "lng": "14.0", "name": "a", "icon": "1.png"}))]
    #[case(json!({"lat": "50.0", "lng": "14.0", "id": 1, "icon": "1.png"}))]
    #[case(json!({"lat": "50.0", "lng": "14.0", "id": 1, "name": "a"}))]
    #[case(json!({"lat": [50.0], "lng": "14.0", "id": 1, "name": "a", "icon": "1.png"}))]
    #[case(json!("not an object"))]
    fn test_malformed_records(#[case] value: Value) {
        let err = record(value).unwrap_err();
        assert!(matches!(err, KravinkaError::MalformedRecord { .. }), "{err}");
    }

    #[rstest]
    #[case("img/icons/1.png", "1.png")]
    #[case("https://example.com/a/b/ 2.png ", "2.png")]
    #[case("  3.png  ", "3.png")]
    #[case("dir/", "")]
    fn test_normalize_icon_token(#[case] icon: &str, #[case] expected: &str) {
        assert_eq!(normalize_icon_token(icon), expected);
    }

    #[test]
    fn test_item_caption_and_links() {
        let rec = PoiRecord {
            coordinates: Coordinates::new(50.0, 14.0),
            id: "12".to_string(),
            name: "Old Mill".to_string(),
            icon: "img/1.png".to_string(),
        };
        let links = LinksConfig::default();
        let item = PoiItem::from_record(rec, 3.5, &links, false);

        assert_eq!(item.caption, " #12: Old Mill");
        assert_eq!(item.icon_token, "1.png");
        assert_eq!(item.min_dist_km, 3.5);
        assert!(item.is_valid);
        assert_eq!(item.links.len(), 2);
        assert_eq!(
            item.links[0].href,
            "https://www.vodnimlyny.cz/en/?do=estateInfo&estateId=12"
        );
        assert_eq!(item.links[0].text, "Old Mill");
        assert_eq!(item.links[1].href, "https://www.vodnimlyny.cz/img/1.png");
        assert_eq!(item.links[1].text, "Image of Old Mill");
    }

    #[test]
    fn test_item_caption_with_detail_link() {
        let rec = PoiRecord {
            coordinates: Coordinates::new(50.0, 14.0),
            id: "12".to_string(),
            name: "Old Mill".to_string(),
            icon: "img/1.png".to_string(),
        };
        let item = PoiItem::from_record(rec, 0.0, &LinksConfig::default(), true);
        assert_eq!(
            item.caption,
            " #12: Old Mill, https://www.vodnimlyny.cz/en/?do=estateInfo&estateId=12"
        );
    }
}
