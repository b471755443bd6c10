//! Great-circle distance between two points on a spherical Earth.

use super::entities::Coordinates;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres.
///
/// Non-finite input yields `NaN`; callers must not treat that as zero.
pub fn distance_km(origin: Coordinates, destination: Coordinates) -> f64 {
    let lat1 = origin.lat.to_radians();
    let lat2 = destination.lat.to_radians();
    let dlat = (destination.lat - origin.lat).to_radians();
    let dlon = (destination.lon - origin.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance rounded to whole kilometres for display.
pub fn display_km(distance: f64) -> u64 {
    if distance.is_finite() && distance > 0.0 {
        distance.round() as u64
    } else {
        0
    }
}
