//! In-memory stand-ins for the map engine, directions service,
//! geolocation provider, notifier and AR prefetcher.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use async_trait::async_trait;
use geo::{Point, Rect};
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use waymark_fixtures::{DEPARTURE, FixturePoi, HANOK_TOUR};
use waymark_geo::{CoordinateKey, EARTH_RADIUS};

use crate::map::{
    LayerSpec, ListenerId, MapError, MapEventKind, MapSurface, MarkerState, PointFeature,
    SourceSpec,
};
use crate::notice::{Notice, Notifier};
use crate::poi::{Poi, PoiCatalogue};
use crate::proximity::ArPrefetch;
use crate::route::{Directions, DirectionsResponse, DirectionsRoute, RouteError, RouteGeometry};
use crate::track::{Fix, GeolocationOptions, GeolocationProvider, LocationError, WatchId};

const METERS_PER_DEGREE: f64 = EARTH_RADIUS * std::f64::consts::PI / 180.0;

/// `point` moved `meters` due north.
pub fn north_of(point: Point, meters: f64) -> Point {
    Point::new(point.x(), point.y() + meters / METERS_PER_DEGREE)
}

pub fn fix(lng: f64, lat: f64, millis: i64) -> Fix {
    Fix::from_epoch_millis(lng, lat, millis).expect("Timestamp must be representable")
}

fn fixture_poi(fixture: &FixturePoi) -> Poi {
    Poi::new(fixture.id, fixture.lng, fixture.lat, fixture.description)
        .expect("Fixture coordinates must be valid")
        .with_image(fixture.image)
}

/// The hanok village walk.
pub fn tour() -> PoiCatalogue {
    PoiCatalogue::new(
        fixture_poi(&DEPARTURE),
        HANOK_TOUR.iter().map(fixture_poi).collect(),
    )
    .expect("Fixture catalogue must be valid")
}

pub fn ok_route(coordinates: &[[f64; 2]]) -> DirectionsResponse {
    DirectionsResponse {
        code: "Ok".to_string(),
        routes: vec![DirectionsRoute {
            geometry: RouteGeometry {
                coordinates: coordinates.to_vec(),
            },
            distance: 420.0,
            duration: 300.0,
        }],
    }
}

#[derive(Debug)]
pub struct FakeMarker {
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnMarker {
    pub key: CoordinateKey,
    pub position: Point,
    pub state: MarkerState,
}

fn point_features(data: &Value) -> Vec<PointFeature> {
    data["features"]
        .as_array()
        .map(|features| {
            features
                .iter()
                .filter_map(|feature| {
                    let coordinates = feature["geometry"]["coordinates"].as_array()?;
                    let lng = coordinates.first()?.as_f64()?;
                    let lat = coordinates.get(1)?.as_f64()?;
                    let title = feature["properties"]["title"].as_str()?;
                    Some(PointFeature::new(Point::new(lng, lat), title))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Map engine keeping everything in memory. Without clustering overrides,
/// every point of a GeoJSON source is reported as unclustered.
#[derive(Debug, Default)]
pub struct FakeMap {
    pub style_loaded: bool,
    pub sources: BTreeMap<String, SourceSpec>,
    pub layers: Vec<LayerSpec>,
    /// Overrides what the clustering engine reports as unclustered.
    pub visible: Option<Vec<PointFeature>>,
    pub markers: BTreeMap<u64, DrawnMarker>,
    pub listeners: BTreeMap<ListenerId, MapEventKind>,
    pub unsubscribed: Vec<ListenerId>,
    pub fitted: Vec<(Rect, u32)>,
    pub eased: Vec<Point>,
    pub marker_calls: Vec<&'static str>,
    pub failing_sources: Vec<String>,
    pub failing_layer_sources: Vec<String>,
    pub fail_markers: bool,
    pub released: bool,
    next_id: u64,
}

impl FakeMap {
    pub fn loaded() -> Self {
        FakeMap {
            style_loaded: true,
            failing_layer_sources: vec!["composite".to_string()],
            ..FakeMap::default()
        }
    }

    pub fn loading() -> Self {
        FakeMap {
            style_loaded: false,
            ..FakeMap::loaded()
        }
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.id.as_str()).collect()
    }

    pub fn count_calls(&self, call: &str) -> usize {
        self.marker_calls.iter().filter(|c| **c == call).count()
    }

    pub fn drawn_keys(&self) -> Vec<CoordinateKey> {
        let mut keys = self.markers.values().map(|m| m.key).collect::<Vec<_>>();
        keys.sort();
        keys
    }

    pub fn drawn_state(&self, key: CoordinateKey) -> Option<MarkerState> {
        self.markers
            .values()
            .find(|marker| marker.key == key)
            .map(|marker| marker.state)
    }

    /// Coordinates of the drawn route line, if any.
    pub fn route_coordinates(&self) -> Option<Vec<[f64; 2]>> {
        let SourceSpec::GeoJson { data, .. } = self.sources.get(crate::route::ROUTE_SOURCE)?;
        serde_json::from_value(data["geometry"]["coordinates"].clone()).ok()
    }
}

impl MapSurface for FakeMap {
    type Marker = FakeMarker;

    fn is_style_loaded(&self) -> bool {
        self.style_loaded
    }

    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<(), MapError> {
        if self.failing_sources.iter().any(|s| s == id) {
            return Err(MapError::Engine(format!("refused source {id}")));
        }
        if self.sources.contains_key(id) {
            return Err(MapError::DuplicateSource(id.to_string()));
        }

        self.sources.insert(id.to_string(), source);
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), MapError> {
        if self.layers.iter().any(|layer| layer.source == id) {
            return Err(MapError::Engine(format!("source {id} still in use")));
        }

        self.sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MapError::MissingSource(id.to_string()))
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), MapError> {
        if self.failing_layer_sources.contains(&layer.source) {
            return Err(MapError::MissingSource(layer.source));
        }
        if self.has_layer(&layer.id) {
            return Err(MapError::DuplicateLayer(layer.id));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(MapError::MissingSource(layer.source));
        }

        self.layers.push(layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), MapError> {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.id != id);

        if self.layers.len() == before {
            return Err(MapError::MissingLayer(id.to_string()));
        }
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|layer| layer.id == id)
    }

    fn query_source_features(&self, source: &str) -> Option<Vec<PointFeature>> {
        let SourceSpec::GeoJson { data, .. } = self.sources.get(source)?;
        Some(self.visible.clone().unwrap_or_else(|| point_features(data)))
    }

    fn subscribe(&mut self, kind: MapEventKind) -> ListenerId {
        let listener = ListenerId(self.next());
        self.listeners.insert(listener, kind);
        listener
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
        self.unsubscribed.push(listener);
    }

    fn ease_to(&mut self, center: Point) {
        self.eased.push(center);
    }

    fn fit_bounds(&mut self, bounds: Rect, padding: u32) {
        self.fitted.push((bounds, padding));
    }

    fn add_marker(
        &mut self,
        key: CoordinateKey,
        position: Point,
        state: MarkerState,
    ) -> Result<FakeMarker, MapError> {
        if self.fail_markers {
            return Err(MapError::Marker(format!("refused marker {key}")));
        }

        let id = self.next();
        self.marker_calls.push("add");
        self.markers.insert(
            id,
            DrawnMarker {
                key,
                position,
                state,
            },
        );
        Ok(FakeMarker { id })
    }

    fn update_marker(&mut self, marker: &mut FakeMarker, state: MarkerState) -> Result<(), MapError> {
        self.marker_calls.push("update");
        let drawn = self
            .markers
            .get_mut(&marker.id)
            .ok_or_else(|| MapError::Marker(format!("unknown marker {}", marker.id)))?;

        drawn.state = state;
        Ok(())
    }

    fn remove_marker(&mut self, marker: FakeMarker) {
        self.marker_calls.push("remove");
        self.markers.remove(&marker.id);
    }

    fn release(&mut self) {
        self.released = true;
    }
}

type Scripted = Result<DirectionsResponse, RouteError>;

enum Script {
    Ready(Scripted),
    Gated(oneshot::Receiver<Scripted>),
}

/// Directions keyed by destination. Unscripted destinations answer 404.
#[derive(Default)]
pub struct ScriptedDirections {
    scripts: RefCell<FxHashMap<CoordinateKey, VecDeque<Script>>>,
    pub calls: Cell<usize>,
}

impl ScriptedDirections {
    pub fn ready(&self, destination: Point, result: Scripted) {
        self.scripts
            .borrow_mut()
            .entry(CoordinateKey::from(destination))
            .or_default()
            .push_back(Script::Ready(result));
    }

    /// The response for `destination` is held back until the returned
    /// sender fires.
    pub fn gated(&self, destination: Point) -> oneshot::Sender<Scripted> {
        let (sender, receiver) = oneshot::channel();
        self.scripts
            .borrow_mut()
            .entry(CoordinateKey::from(destination))
            .or_default()
            .push_back(Script::Gated(receiver));
        sender
    }
}

#[async_trait(?Send)]
impl Directions for ScriptedDirections {
    async fn walking(&self, _origin: Point, destination: Point) -> Result<DirectionsResponse, RouteError> {
        self.calls.set(self.calls.get() + 1);

        let script = self
            .scripts
            .borrow_mut()
            .get_mut(&CoordinateKey::from(destination))
            .and_then(VecDeque::pop_front);

        match script {
            Some(Script::Ready(result)) => result,
            Some(Script::Gated(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(RouteError::Transport("gate dropped".to_string()))),
            None => Err(RouteError::Status(404)),
        }
    }
}

#[async_trait(?Send)]
impl<T: Directions + ?Sized> Directions for std::rc::Rc<T> {
    async fn walking(&self, origin: Point, destination: Point) -> Result<DirectionsResponse, RouteError> {
        (**self).walking(origin, destination).await
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn taken(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[derive(Debug, Default)]
pub struct CountingPrefetch {
    pub count: Cell<usize>,
}

impl ArPrefetch for CountingPrefetch {
    fn prefetch(&self) {
        self.count.set(self.count.get() + 1);
    }
}

#[derive(Debug, Default)]
pub struct FakeGeolocation {
    pub active: RefCell<Vec<WatchId>>,
    pub cleared: RefCell<Vec<WatchId>>,
    pub refuse: Cell<Option<LocationError>>,
    pub current: Cell<Option<Result<Fix, LocationError>>>,
    next: Cell<u64>,
}

#[async_trait(?Send)]
impl GeolocationProvider for FakeGeolocation {
    fn watch_position(&self, _options: &GeolocationOptions) -> Result<WatchId, LocationError> {
        if let Some(error) = self.refuse.get() {
            return Err(error);
        }

        self.next.set(self.next.get() + 1);
        let watch = WatchId(self.next.get());
        self.active.borrow_mut().push(watch);
        Ok(watch)
    }

    fn clear_watch(&self, watch: WatchId) {
        self.active.borrow_mut().retain(|active| *active != watch);
        self.cleared.borrow_mut().push(watch);
    }

    async fn current_position(&self, _options: &GeolocationOptions) -> Result<Fix, LocationError> {
        self.current.get().unwrap_or(Err(LocationError::PositionUnavailable))
    }
}

#[async_trait(?Send)]
impl<T: GeolocationProvider + ?Sized> GeolocationProvider for std::rc::Rc<T> {
    fn watch_position(&self, options: &GeolocationOptions) -> Result<WatchId, LocationError> {
        (**self).watch_position(options)
    }

    fn clear_watch(&self, watch: WatchId) {
        (**self).clear_watch(watch)
    }

    async fn current_position(&self, options: &GeolocationOptions) -> Result<Fix, LocationError> {
        (**self).current_position(options).await
    }
}
