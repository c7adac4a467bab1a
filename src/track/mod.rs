//! Continuous location tracking with jitter suppression.

#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod filter;
#[doc(hidden)]
pub mod tracker;

#[cfg(test)]
mod test;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geo::Point;
use serde::Deserialize;

#[doc(inline)]
pub use error::LocationError;
#[doc(inline)]
pub use filter::NoiseFilter;
#[doc(inline)]
pub use tracker::{Accepted, LocationTracker};

/// A position reported by the platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fix {
    pub position: Point,
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    pub fn new(position: Point, timestamp: DateTime<Utc>) -> Self {
        Fix {
            position,
            timestamp,
        }
    }

    /// Builds a fix from a platform timestamp in milliseconds since the
    /// unix epoch. Returns `None` for timestamps chrono cannot represent.
    pub fn from_epoch_millis(lng: f64, lat: f64, millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(|timestamp| Fix {
            position: Point::new(lng, lat),
            timestamp,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        GeolocationOptions {
            high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

impl GeolocationOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// The platform geolocation API.
///
/// Watched fixes and errors are delivered by the host to
/// [`LocationTracker::on_fix`] and [`LocationTracker::on_error`] (usually
/// through the walk session).
#[async_trait(?Send)]
pub trait GeolocationProvider {
    fn watch_position(&self, options: &GeolocationOptions) -> Result<WatchId, LocationError>;

    fn clear_watch(&self, watch: WatchId);

    async fn current_position(&self, options: &GeolocationOptions) -> Result<Fix, LocationError>;
}
