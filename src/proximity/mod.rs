//! Arrival detection.

#[doc(hidden)]
pub mod monitor;


#[doc(inline)]
pub use monitor::{ArMarkerData, ArPrefetch, Nearest, Proximity, ProximityMonitor, nearest_active};
