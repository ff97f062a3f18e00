//! Data models for the exporter
//!
//! - Location: coordinates and reference points used by the proximity filter
//! - Poi: dataset records and the ranked items derived from them

pub mod location;
pub mod poi;

// Re-export all public types for convenient access
pub use location::{Coordinates, ReferencePoint};
pub use poi::{PoiItem, PoiLink, PoiRecord, RawPoiRecord, normalize_icon_token};
