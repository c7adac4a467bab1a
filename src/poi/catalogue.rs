use geo::Point;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Value, json};
use waymark_geo::{CoordinateKey, checked_point};

use crate::poi::PoiError;

/// A named, immutable place on the walk. The identifier doubles as the
/// marker title.
#[derive(Clone, Debug, PartialEq)]
pub struct Poi {
    pub id: String,
    pub position: Point,
    pub description: String,
    pub image_url: Option<String>,
}

impl Poi {
    pub fn new(
        id: impl Into<String>,
        lng: f64,
        lat: f64,
        description: impl Into<String>,
    ) -> Result<Poi, PoiError> {
        Ok(Poi {
            id: id.into(),
            position: checked_point(lng, lat)?,
            description: description.into(),
            image_url: None,
        })
    }

    pub fn with_image(self, image_url: impl Into<String>) -> Self {
        Poi {
            image_url: Some(image_url.into()),
            ..self
        }
    }

    #[inline]
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::from(self.position)
    }

    fn feature(&self) -> Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [self.position.x(), self.position.y()],
            },
            "properties": {
                "title": self.id,
                "description": self.description,
            },
        })
    }
}

/// The fixed departure point plus the ordered list of destinations.
///
/// Destination order is significant: it is the iteration order used when
/// two destinations are exactly as far from the walker.
#[derive(Clone, Debug)]
pub struct PoiCatalogue {
    departure: Poi,
    destinations: Vec<Poi>,
    by_key: FxHashMap<CoordinateKey, usize>,
}

impl PoiCatalogue {
    pub fn new(departure: Poi, destinations: Vec<Poi>) -> Result<PoiCatalogue, PoiError> {
        let mut ids = FxHashSet::default();
        let mut by_key = FxHashMap::default();

        for (index, poi) in destinations.iter().enumerate() {
            if poi.id == departure.id {
                return Err(PoiError::DepartureAsDestination(poi.id.clone()));
            }

            if !ids.insert(poi.id.as_str()) {
                return Err(PoiError::DuplicateId(poi.id.clone()));
            }

            if let Some(existing) = by_key.insert(poi.key(), index) {
                return Err(PoiError::DuplicatePosition(
                    destinations[existing].id.clone(),
                    poi.id.clone(),
                ));
            }
        }

        debug!(
            "Catalogue of {} destinations departing from {:?}",
            destinations.len(),
            departure.id
        );

        Ok(PoiCatalogue {
            departure,
            destinations,
            by_key,
        })
    }

    pub fn departure(&self) -> &Poi {
        &self.departure
    }

    pub fn destinations(&self) -> &[Poi] {
        &self.destinations
    }

    pub fn total(&self) -> usize {
        self.destinations.len()
    }

    pub fn get(&self, id: &str) -> Option<&Poi> {
        self.destinations.iter().find(|poi| poi.id == id)
    }

    /// Resolves a marker key back to its destination. The departure point
    /// never resolves.
    pub fn find_by_key(&self, key: CoordinateKey) -> Option<&Poi> {
        self.by_key.get(&key).map(|index| &self.destinations[*index])
    }

    /// GeoJSON `FeatureCollection` of every destination, used as the
    /// clustered marker source.
    pub fn feature_collection(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.destinations.iter().map(Poi::feature).collect::<Vec<_>>(),
        })
    }
}
