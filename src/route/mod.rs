//! Walking directions and the single active route.

#[doc(hidden)]
pub mod coordinator;
#[doc(hidden)]
pub mod directions;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod generation;
#[cfg(feature = "http")]
pub mod http;


#[doc(inline)]
pub use coordinator::{ROUTE_LAYER, ROUTE_SOURCE, RouteOutcome, RouteRequest, RoutingCoordinator};
#[doc(inline)]
pub use directions::{Directions, DirectionsResponse, DirectionsRoute, RouteGeometry};
#[doc(inline)]
pub use error::RouteError;
#[doc(inline)]
pub use generation::{Generation, Token};
#[cfg(feature = "http")]
#[doc(inline)]
pub use http::HttpDirections;
