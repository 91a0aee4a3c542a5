/// Mean Earth radius in miles; keeps distances in the same unit as the
/// radius filter.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance in miles between two points given in decimal
/// degrees, via the haversine formula on a spherical Earth.
pub fn distance_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Clamp guards against rounding pushing sqrt's argument past 1 for
    // near-antipodal points.
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_MILES * c
}
