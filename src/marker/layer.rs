use geo::Point;
use log::{debug, trace, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use waymark_geo::CoordinateKey;
#[cfg(feature = "tracing")]
use tracing::Level;

use crate::map::{MapSurface, MarkerState, PointFeature};
use crate::poi::DisabledSet;

/// A marker currently drawn on the map, with the flags it was last
/// rendered with.
#[derive(Debug)]
pub struct RenderedMarker<H> {
    pub handle: H,
    pub position: Point,
    pub title: String,
    pub state: MarkerState,
}

/// What a reconciliation pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    /// Features whose handle could not be created or re-rendered; retried
    /// on the next pass.
    pub failed: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        *self == ReconcileReport::default()
    }
}

/// The set of rendered marker handles, one per coordinate key.
#[derive(Debug)]
pub struct MarkerLayer<H> {
    handles: FxHashMap<CoordinateKey, RenderedMarker<H>>,
}

impl<H> Default for MarkerLayer<H> {
    fn default() -> Self {
        MarkerLayer {
            handles: FxHashMap::default(),
        }
    }
}

impl<H> MarkerLayer<H> {
    pub fn new() -> Self {
        MarkerLayer::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn contains(&self, key: &CoordinateKey) -> bool {
        self.handles.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CoordinateKey> {
        self.handles.keys()
    }

    pub fn get(&self, key: &CoordinateKey) -> Option<&RenderedMarker<H>> {
        self.handles.get(key)
    }

    pub fn state_of(&self, key: &CoordinateKey) -> Option<MarkerState> {
        self.handles.get(key).map(|marker| marker.state)
    }

    /// Brings the handle set in line with `features`: creates handles for
    /// new keys, re-renders handles whose flags changed, and destroys
    /// handles whose key is absent from `features`.
    ///
    /// Running it twice over the same input changes nothing the second time.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::DEBUG, skip_all, fields(features = features.len())))]
    pub fn reconcile<M>(
        &mut self,
        map: &mut M,
        features: &[PointFeature],
        disabled: &DisabledSet,
        walk_mode: bool,
    ) -> ReconcileReport
    where
        M: MapSurface<Marker = H>,
    {
        let mut report = ReconcileReport::default();
        let mut seen: FxHashSet<CoordinateKey> = FxHashSet::default();

        for feature in features {
            let key = feature.key();
            seen.insert(key);

            let state = MarkerState::compute(walk_mode, disabled.contains(&feature.title));

            match self.handles.get_mut(&key) {
                Some(marker) if marker.state == state => {
                    trace!("Marker {key} unchanged");
                }
                Some(marker) => match map.update_marker(&mut marker.handle, state) {
                    Ok(()) => {
                        trace!("Marker {key} re-rendered as {state:?}");
                        marker.state = state;
                        report.updated += 1;
                    }
                    Err(error) => {
                        warn!("Could not re-render marker {key}: {error}");
                        report.failed += 1;
                    }
                },
                None => match map.add_marker(key, feature.position, state) {
                    Ok(handle) => {
                        trace!("Marker {key} created for {:?}", feature.title);
                        self.handles.insert(
                            key,
                            RenderedMarker {
                                handle,
                                position: feature.position,
                                title: feature.title.clone(),
                                state,
                            },
                        );
                        report.created += 1;
                    }
                    Err(error) => {
                        warn!("Could not create marker {key}: {error}");
                        report.failed += 1;
                    }
                },
            }
        }

        let stale = self
            .handles
            .keys()
            .filter(|key| !seen.contains(*key))
            .copied()
            .collect::<Vec<_>>();

        for key in stale {
            if let Some(marker) = self.handles.remove(&key) {
                trace!("Marker {key} destroyed");
                map.remove_marker(marker.handle);
                report.removed += 1;
            }
        }

        if !report.is_noop() {
            debug!(
                "Reconciled {} features: {} created, {} updated, {} removed, {} failed",
                features.len(),
                report.created,
                report.updated,
                report.removed,
                report.failed
            );
        }

        report
    }

    /// Destroys every handle. Returns how many were removed.
    pub fn clear<M>(&mut self, map: &mut M) -> usize
    where
        M: MapSurface<Marker = H>,
    {
        let count = self.handles.len();

        for (_, marker) in self.handles.drain() {
            map.remove_marker(marker.handle);
        }

        count
    }
}
