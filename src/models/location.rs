//! Geographic coordinates and reference locations

use serde::{Deserialize, Serialize};

use crate::geo;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        geo::distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// A named location with an acceptance radius.
///
/// A point of interest passes the proximity filter when it lies within
/// `threshold_km` of at least one configured reference point.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReferencePoint {
    /// Display name (city, region, etc.)
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Acceptance radius in kilometers (inclusive)
    pub threshold_km: f64,
}

impl ReferencePoint {
    /// Create a new reference point
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, threshold_km: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            threshold_km,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Distance from this reference point to `target` in kilometers
    #[must_use]
    pub fn distance_to(&self, target: &Coordinates) -> f64 {
        target.distance_km(&self.coordinates())
    }

    /// Whether a distance satisfies this point's radius (boundary inclusive)
    #[must_use]
    pub fn accepts(&self, distance_km: f64) -> bool {
        distance_km <= self.threshold_km
    }
}
