/// Mean Earth radius used for track distances, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Great-circle distance in meters between two points given in decimal degrees.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`]. The
/// result is not rounded; NaN inputs yield NaN.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1_rad, lat2_rad) = (lat1.to_radians(), lat2.to_radians());
    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2.to_radians() - lon1.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Rounds to two decimal places.
pub fn round_to_centimeters(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
