//! Contracts towards the external map rendering engine.
//!
//! The engine owns rendering, styling and clustering; `waymark` only needs
//! the narrow surface described by [`MapSurface`]. Hosts implement it over
//! their engine of choice, and tests implement it in memory.

pub mod event;
pub mod teardown;

use std::fmt::{Display, Formatter};

use geo::{Point, Rect};
use serde::Deserialize;
use serde_json::Value;
use waymark_geo::CoordinateKey;

#[doc(inline)]
pub use event::{ListenerId, MapEvent, MapEventKind};
#[doc(inline)]
pub use teardown::Teardown;

/// Options the host creates its map with.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub container: String,
    pub style: String,
    /// `[lng, lat]`; the departure point is used when absent.
    pub center: Option<[f64; 2]>,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            container: "map".to_string(),
            style: "mapbox://styles/mapbox/light-v11".to_string(),
            center: None,
            zoom: 16.5,
            pitch: 60.0,
            bearing: -17.6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    pub enabled: bool,
    pub max_zoom: u8,
    pub radius: u32,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        ClusterOptions {
            enabled: true,
            max_zoom: 14,
            radius: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SourceSpec {
    GeoJson {
        data: Value,
        cluster: Option<ClusterOptions>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum LayerKind {
    Circle,
    Symbol,
    Line,
    FillExtrusion,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub kind: LayerKind,
    /// Layer inside a vector tile source; unused for GeoJSON sources.
    pub source_layer: Option<String>,
    pub filter: Option<Value>,
    pub layout: Value,
    pub paint: Value,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, source: impl Into<String>, kind: LayerKind) -> Self {
        LayerSpec {
            id: id.into(),
            source: source.into(),
            kind,
            source_layer: None,
            filter: None,
            layout: Value::Null,
            paint: Value::Null,
        }
    }

    pub fn source_layer(self, source_layer: impl Into<String>) -> Self {
        LayerSpec {
            source_layer: Some(source_layer.into()),
            ..self
        }
    }

    pub fn filter(self, filter: Value) -> Self {
        LayerSpec {
            filter: Some(filter),
            ..self
        }
    }

    pub fn layout(self, layout: Value) -> Self {
        LayerSpec { layout, ..self }
    }

    pub fn paint(self, paint: Value) -> Self {
        LayerSpec { paint, ..self }
    }
}

/// A single, unclustered point as reported by the map's data source.
#[derive(Clone, Debug, PartialEq)]
pub struct PointFeature {
    pub position: Point,
    pub title: String,
}

impl PointFeature {
    pub fn new(position: Point, title: impl Into<String>) -> Self {
        PointFeature {
            position,
            title: title.into(),
        }
    }

    #[inline]
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::from(self.position)
    }
}

/// Visual state of a rendered marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MarkerState {
    pub disabled: bool,
    pub interactive: bool,
}

impl MarkerState {
    pub fn compute(walk_mode: bool, consumed: bool) -> Self {
        let disabled = walk_mode && consumed;

        MarkerState {
            disabled,
            interactive: walk_mode && !disabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    StyleNotLoaded,
    DuplicateSource(String),
    MissingSource(String),
    DuplicateLayer(String),
    MissingLayer(String),
    Marker(String),
    Engine(String),
}

impl Display for MapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::StyleNotLoaded => write!(f, "map style is not loaded yet"),
            MapError::DuplicateSource(id) => write!(f, "source {id:?} already exists"),
            MapError::MissingSource(id) => write!(f, "source {id:?} does not exist"),
            MapError::DuplicateLayer(id) => write!(f, "layer {id:?} already exists"),
            MapError::MissingLayer(id) => write!(f, "layer {id:?} does not exist"),
            MapError::Marker(reason) => write!(f, "marker failure: {reason}"),
            MapError::Engine(reason) => write!(f, "map engine failure: {reason}"),
        }
    }
}

impl std::error::Error for MapError {}

/// The map engine, as seen by a walk session.
///
/// Calls are made from a single thread; implementations need not be `Send`.
pub trait MapSurface {
    /// Handle owning one rendered marker element.
    type Marker;

    fn is_style_loaded(&self) -> bool;

    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<(), MapError>;
    fn remove_source(&mut self, id: &str) -> Result<(), MapError>;
    fn has_source(&self, id: &str) -> bool;

    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), MapError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), MapError>;
    fn has_layer(&self, id: &str) -> bool;

    /// Currently unclustered single-point features of `source`, or `None`
    /// when the source does not exist (yet).
    fn query_source_features(&self, source: &str) -> Option<Vec<PointFeature>>;

    fn subscribe(&mut self, kind: MapEventKind) -> ListenerId;
    fn unsubscribe(&mut self, listener: ListenerId);

    fn ease_to(&mut self, center: Point);
    fn fit_bounds(&mut self, bounds: Rect, padding: u32);

    fn add_marker(
        &mut self,
        key: CoordinateKey,
        position: Point,
        state: MarkerState,
    ) -> Result<Self::Marker, MapError>;
    fn update_marker(&mut self, marker: &mut Self::Marker, state: MarkerState)
    -> Result<(), MapError>;
    fn remove_marker(&mut self, marker: Self::Marker);

    /// Releases the engine instance. No other call follows.
    fn release(&mut self);
}
