use std::rc::Rc;

use geo::Point;
use log::{debug, info};
use waymark_geo::haversine;

use crate::poi::{DisabledSet, Poi, PoiCatalogue};

/// The closest active destination and how far away it is.
#[derive(Clone, Debug, PartialEq)]
pub struct Nearest {
    pub poi_id: String,
    pub distance_m: f64,
}

/// Result of one proximity evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Proximity {
    pub nearest: Option<Nearest>,
    pub in_range: bool,
}

impl Proximity {
    /// The AR affordance is offered exactly when the walker is in range.
    pub fn show_ar_button(&self) -> bool {
        self.in_range
    }
}

/// Payload handed to the AR overlay when it is opened for a POI.
#[derive(Clone, Debug, PartialEq)]
pub struct ArMarkerData {
    pub id: String,
    pub coords: Point,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

impl From<&Poi> for ArMarkerData {
    fn from(poi: &Poi) -> Self {
        ArMarkerData {
            id: poi.id.clone(),
            coords: poi.position,
            title: poi.id.clone(),
            description: poi.description.clone(),
            image_url: poi.image_url.clone(),
        }
    }
}

/// Warms up the AR overlay module ahead of first use.
pub trait ArPrefetch {
    fn prefetch(&self);
}

impl<T: ArPrefetch + ?Sized> ArPrefetch for Rc<T> {
    fn prefetch(&self) {
        (**self).prefetch()
    }
}

impl<T: ArPrefetch + ?Sized> ArPrefetch for Box<T> {
    fn prefetch(&self) {
        (**self).prefetch()
    }
}

/// Finds the destination closest to `location` that is not in `disabled`.
///
/// Ties resolve to the destination listed first in the catalogue.
pub fn nearest_active(
    location: Point,
    catalogue: &PoiCatalogue,
    disabled: &DisabledSet,
) -> Option<Nearest> {
    let mut nearest: Option<(&Poi, f64)> = None;

    for poi in catalogue.destinations() {
        if disabled.contains(&poi.id) {
            continue;
        }

        let distance = haversine(location, poi.position);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((poi, distance)),
        }
    }

    nearest.map(|(poi, distance_m)| Nearest {
        poi_id: poi.id.clone(),
        distance_m,
    })
}

/// Computes [`Proximity`] and fires the one-time AR prefetch the first
/// time the walker comes within range.
#[derive(Clone, Debug)]
pub struct ProximityMonitor {
    arrival_radius_m: f64,
    prefetched: bool,
}

impl ProximityMonitor {
    pub fn new(arrival_radius_m: f64) -> Self {
        ProximityMonitor {
            arrival_radius_m,
            prefetched: false,
        }
    }

    pub fn arrival_radius_m(&self) -> f64 {
        self.arrival_radius_m
    }

    pub fn has_prefetched(&self) -> bool {
        self.prefetched
    }

    /// Evaluates proximity from the values passed in; nothing is cached
    /// between calls apart from the prefetch gate.
    pub fn evaluate(
        &mut self,
        location: Option<Point>,
        catalogue: &PoiCatalogue,
        disabled: &DisabledSet,
        walk_mode: bool,
        prefetch: &dyn ArPrefetch,
    ) -> Proximity {
        let Some(location) = location.filter(|_| walk_mode) else {
            return Proximity::default();
        };

        let Some(nearest) = nearest_active(location, catalogue, disabled) else {
            return Proximity::default();
        };

        let in_range = nearest.distance_m <= self.arrival_radius_m;
        debug!(
            "Nearest active POI {:?} at {:.1}m (in range: {in_range})",
            nearest.poi_id, nearest.distance_m
        );

        if in_range && !self.prefetched {
            info!("First arrival at {:?}, prefetching AR overlay", nearest.poi_id);
            self.prefetched = true;
            prefetch.prefetch();
        }

        Proximity {
            nearest: Some(nearest),
            in_range,
        }
    }
}
