//! GPX 1.1 waypoint export
//!
//! Ranked points are written as `wpt` elements in ranked order, stopping
//! once the configured limit has been reached.

use quick_xml::de::from_str;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::OutputConfig;
use crate::error::KravinkaError;
use crate::models::PoiItem;
use crate::Result;

pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Serialize)]
#[serde(rename = "gpx")]
struct GpxDocument<'a> {
    #[serde(rename = "@version")]
    version: &'static str,
    #[serde(rename = "@creator")]
    creator: &'a str,
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: &'static str,
    #[serde(rename = "@xsi:schemaLocation")]
    schema_location: &'static str,
    #[serde(rename = "wpt")]
    waypoints: Vec<GpxWaypoint<'a>>,
}

#[derive(Debug, Serialize)]
struct GpxWaypoint<'a> {
    #[serde(rename = "@lat")]
    lat: f64,
    #[serde(rename = "@lon")]
    lon: f64,
    name: &'a str,
    #[serde(rename = "link")]
    links: Vec<GpxLink<'a>>,
}

#[derive(Debug, Serialize)]
struct GpxLink<'a> {
    #[serde(rename = "@href")]
    href: &'a str,
    text: &'a str,
}

impl<'a> GpxWaypoint<'a> {
    fn from_item(item: &'a PoiItem) -> Self {
        Self {
            lat: item.coordinates.latitude,
            lon: item.coordinates.longitude,
            name: &item.caption,
            links: item
                .links
                .iter()
                .map(|link| GpxLink {
                    href: &link.href,
                    text: &link.text,
                })
                .collect(),
        }
    }
}

/// Render at most `output.limit` items as a GPX document
pub fn render<'a, I>(items: I, output: &OutputConfig) -> Result<String>
where
    I: IntoIterator<Item = &'a PoiItem>,
{
    let document = GpxDocument {
        version: "1.1",
        creator: &output.creator,
        xmlns: GPX_NAMESPACE,
        xmlns_xsi: XSI_NAMESPACE,
        schema_location: SCHEMA_LOCATION,
        waypoints: items
            .into_iter()
            .take(output.limit)
            .map(GpxWaypoint::from_item)
            .collect(),
    };

    let mut xml = String::from(XML_DECLARATION);
    xml.push('\n');

    let mut serializer = Serializer::new(&mut xml);
    if output.pretty_print {
        serializer.indent(' ', 2);
    }
    document
        .serialize(serializer)
        .map_err(|e| KravinkaError::xml(format!("Failed to serialize GPX: {e}")))?;

    Ok(xml)
}

/// Write the GPX document to `output.path`, returning the number of waypoints written
pub fn write_file<'a, I>(items: I, output: &OutputConfig) -> Result<usize>
where
    I: IntoIterator<Item = &'a PoiItem>,
{
    let items: Vec<&PoiItem> = items.into_iter().take(output.limit).collect();
    let written = items.len();
    let xml = render(items, output)?;

    write_document(&output.path, &xml)?;
    info!("Wrote {} waypoints to {:?}", written, output.path);

    Ok(written)
}

fn write_document(path: &Path, xml: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, xml)?;
    Ok(())
}

/// A waypoint read back from a GPX document.
///
/// `name` and link `text` are trimmed, so the leading space of a written
/// caption such as `" #1: Mill 1"` reads back as `"#1: Mill 1"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Waypoint {
    #[serde(rename = "@lat")]
    pub lat: f64,
    #[serde(rename = "@lon")]
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "link", default)]
    pub links: Vec<WaypointLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WaypointLink {
    #[serde(rename = "@href")]
    pub href: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaypointDocument {
    #[serde(rename = "@creator", default)]
    creator: Option<String>,
    #[serde(rename = "wpt", default)]
    waypoints: Vec<Waypoint>,
}

/// Parse the waypoints of a GPX document.
///
/// Surrounding whitespace of text content is trimmed on read, whatever the
/// XML reader itself does. The file on disk keeps the exact caption.
pub fn read_waypoints(xml: &str) -> Result<Vec<Waypoint>> {
    let document: WaypointDocument = from_str(xml)
        .map_err(|e| KravinkaError::xml(format!("Failed to parse GPX: {e}")))?;

    Ok(document
        .waypoints
        .into_iter()
        .map(|mut waypoint| {
            waypoint.name = waypoint.name.map(|name| name.trim().to_string());
            for link in &mut waypoint.links {
                link.text = link.text.take().map(|text| text.trim().to_string());
            }
            waypoint
        })
        .collect())
}

/// Value of the root `creator` attribute, if any
pub fn read_creator(xml: &str) -> Result<Option<String>> {
    let document: WaypointDocument = from_str(xml)
        .map_err(|e| KravinkaError::xml(format!("Failed to parse GPX: {e}")))?;
    Ok(document.creator)
}
