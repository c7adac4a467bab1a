//! Marker reconciliation.
//!
//! The map's clustering source decides which points are drawn as single
//! markers at the current zoom. [`MarkerLayer`] keeps exactly one rendered
//! handle per such point, keyed by [`CoordinateKey`](waymark_geo::CoordinateKey),
//! and [`FrameCoalescer`] folds bursts of map events into a single pass per
//! animation frame.

#[doc(hidden)]
pub mod frame;
#[doc(hidden)]
pub mod layer;


#[doc(inline)]
pub use frame::FrameCoalescer;
#[doc(inline)]
pub use layer::{MarkerLayer, ReconcileReport, RenderedMarker};
