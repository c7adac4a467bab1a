//! Points of interest and walk progress.

#[doc(hidden)]
pub mod catalogue;
#[doc(hidden)]
pub mod disabled;


use std::fmt::{Display, Formatter};

use waymark_geo::GeoError;

#[doc(inline)]
pub use catalogue::{Poi, PoiCatalogue};
#[doc(inline)]
pub use disabled::{DisabledSet, Progress};

#[derive(Debug, Clone, PartialEq)]
pub enum PoiError {
    InvalidCoordinate(GeoError),
    DuplicateId(String),
    /// Two POIs round to the same marker key, so only one could be drawn.
    DuplicatePosition(String, String),
    DepartureAsDestination(String),
}

impl From<GeoError> for PoiError {
    fn from(value: GeoError) -> Self {
        PoiError::InvalidCoordinate(value)
    }
}

impl Display for PoiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PoiError::InvalidCoordinate(error) => write!(f, "{error}"),
            PoiError::DuplicateId(id) => write!(f, "duplicate point of interest {id:?}"),
            PoiError::DuplicatePosition(a, b) => {
                write!(f, "points of interest {a:?} and {b:?} share a position")
            }
            PoiError::DepartureAsDestination(id) => {
                write!(f, "departure point {id:?} cannot also be a destination")
            }
        }
    }
}

impl std::error::Error for PoiError {}
