use crate::EARTH_RADIUS;
use geo::Point;

/// Great-circle distance in meters between two latitude/longitude pairs
/// given in degrees.
///
/// Symmetric in its two positions, zero for identical positions and
/// monotonic in the angular separation between them.
///
/// ```rust
/// use waymark_geo::distance_meters;
///
/// let d = distance_meters(35.8150, 127.1480, 35.8150, 127.1480);
/// assert_eq!(d, 0.0);
/// ```
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    // Rounding may push `a` a hair past 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS * c
}

/// [`distance_meters`] over two `(lng, lat)` points.
#[inline]
pub fn haversine(lhs: Point, rhs: Point) -> f64 {
    distance_meters(lhs.y(), lhs.x(), rhs.y(), rhs.x())
}
