//! Pure geo-math shared by the `waymark` crates.
//!
//! Distances are great-circle (haversine) distances over a spherical earth
//! of radius [`EARTH_RADIUS`], and all coordinates are `(lng, lat)` ordered
//! [`geo::Point`]s, matching what map engines and directions services emit.

/// Spherical earth radius, in meters, used for every distance in `waymark`.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Number of decimal digits retained by a [`CoordinateKey`].
pub const KEY_PRECISION: i32 = 8;

pub mod distance;
#[doc(hidden)]
pub mod error;
pub mod key;
pub mod line;


#[doc(inline)]
pub use distance::{distance_meters, haversine};
#[doc(inline)]
pub use error::GeoError;
#[doc(inline)]
pub use key::CoordinateKey;
#[doc(inline)]
pub use line::{bounds, collapse_vertices};

/// Validates a longitude/latitude pair, returning it as a [`geo::Point`].
///
/// ```rust
/// use waymark_geo::checked_point;
///
/// let point = checked_point(127.1480, 35.8150).expect("valid coordinate");
/// assert_eq!(point.x(), 127.1480);
///
/// assert!(checked_point(127.1480, 95.0).is_err());
/// ```
pub fn checked_point(lng: f64, lat: f64) -> Result<geo::Point, GeoError> {
    if !lat.is_finite() || !(-90f64..=90f64).contains(&lat) {
        return Err(GeoError::InvalidCoordinate(format!(
            "Latitude must be within -90 and 90. Given: {}",
            lat
        )));
    }

    if !lng.is_finite() || !(-180f64..=180f64).contains(&lng) {
        return Err(GeoError::InvalidCoordinate(format!(
            "Longitude must be within -180 and 180. Given: {}",
            lng
        )));
    }

    Ok(geo::Point::new(lng, lat))
}
