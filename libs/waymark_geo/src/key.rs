//! Marker identity keys.
//!
//! A marker on the map is identified purely by where it sits. Two positions
//! share a key exactly when their longitude and latitude agree once rounded
//! to [`KEY_PRECISION`] decimal digits, which is the precision the marker
//! source is written with.

use std::fmt::{Display, Formatter};

use geo::Point;

use crate::KEY_PRECISION;

const SCALE: f64 = 1e8;

/// Fixed-precision `(lng, lat)` key, stored as integer multiples of 1e-8
/// degrees so that hashing and equality never depend on float formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey {
    lng: i64,
    lat: i64,
}

impl CoordinateKey {
    pub fn new(lng: f64, lat: f64) -> Self {
        debug_assert_eq!(SCALE, 10f64.powi(KEY_PRECISION));

        CoordinateKey {
            lng: (lng * SCALE).round() as i64,
            lat: (lat * SCALE).round() as i64,
        }
    }

    /// The `(lng, lat)` pair the key represents, in degrees.
    pub fn lng_lat(&self) -> (f64, f64) {
        (self.lng as f64 / SCALE, self.lat as f64 / SCALE)
    }
}

impl From<Point> for CoordinateKey {
    fn from(point: Point) -> Self {
        CoordinateKey::new(point.x(), point.y())
    }
}

impl From<&Point> for CoordinateKey {
    fn from(point: &Point) -> Self {
        CoordinateKey::from(*point)
    }
}

fn write_fixed(f: &mut Formatter<'_>, units: i64) -> std::fmt::Result {
    let sign = if units < 0 { "-" } else { "" };
    let units = units.unsigned_abs();
    let scale = SCALE as u64;

    write!(f, "{sign}{}.{:08}", units / scale, units % scale)
}

/// Renders as `"<lng>,<lat>"`, each with exactly eight decimal digits.
impl Display for CoordinateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_fixed(f, self.lng)?;
        write!(f, ",")?;
        write_fixed(f, self.lat)
    }
}
