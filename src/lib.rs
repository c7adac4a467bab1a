#![doc = include_str!("../README.md")]

#[doc(hidden)]
pub mod error;
pub mod util;

pub mod config;
pub mod map;
pub mod marker;
pub mod notice;
pub mod poi;
pub mod proximity;
pub mod route;
pub mod session;
pub mod track;

#[cfg(test)]
pub(crate) mod testing;

#[doc(inline)]
pub use config::Config;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use map::MapSurface;
#[doc(inline)]
pub use marker::{FrameCoalescer, MarkerLayer, ReconcileReport};
#[doc(inline)]
pub use notice::{Notice, Notifier};
#[doc(inline)]
pub use poi::{DisabledSet, Poi, PoiCatalogue, Progress};
#[doc(inline)]
pub use proximity::{ArPrefetch, Proximity, ProximityMonitor};
#[doc(inline)]
pub use route::{Directions, RouteOutcome, RouteRequest, RoutingCoordinator};
#[doc(inline)]
pub use session::{Collaborators, WalkSession};
#[doc(inline)]
pub use track::{Fix, GeolocationProvider, LocationError, LocationTracker, NoiseFilter};

pub use waymark_geo as geo_math;
