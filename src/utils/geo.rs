//! Spherical geometry for the radius search.

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3963.2;

/// A search distance in miles expressed as an angle on the sphere.
pub fn radius_radians(distance_miles: f64) -> f64 {
    distance_miles / EARTH_RADIUS_MILES
}

/// Central angle in radians between two points given in degrees
/// (haversine formula).
pub fn central_angle(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lng2) = (to.0.to_radians(), to.1.to_radians());

    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * a.sqrt().min(1.0).asin()
}

pub fn within_radius(center: (f64, f64), point: (f64, f64), radius: f64) -> bool {
    central_angle(center, point) <= radius
}

/// Latitude bounds (degrees) that contain every point within `radius` of
/// `latitude`. Used to narrow the candidate rows before the exact check.
pub fn latitude_band(latitude: f64, radius: f64) -> (f64, f64) {
    let delta = radius.to_degrees();
    ((latitude - delta).max(-90.0), (latitude + delta).min(90.0))
}
