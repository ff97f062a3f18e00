//! Great-circle distance on a spherical Earth

/// Mean Earth radius used by the haversine formula, in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points given in decimal degrees.
///
/// Any real-valued input is accepted; the caller is responsible for passing
/// parsed, finite coordinates.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: lat1,
            longitude: lon1,
        },
        haversine::Location {
            latitude: lat2,
            longitude: lon2,
        },
        haversine::Units::Kilometers,
    )
}
