//! A walk session: one map, one catalogue, one walker.
//!
//! [`WalkSession`] wires the location tracker, proximity monitor, marker
//! layer and routing coordinator together and owns the state they share.
//! Everything runs on one thread. Public methods take `&self`, state lives
//! behind `RefCell`s, and no borrow is held across an await point, so map
//! events and location fixes can be handled while a route request is in
//! flight.


use std::cell::RefCell;
use std::future::Future;

use geo::Point;
use log::{debug, error, info, warn};
use serde_json::json;
use waymark_geo::CoordinateKey;
#[cfg(feature = "tracing")]
use tracing::Level;

use crate::config::{Config, DisabledPolicy};
use crate::map::{
    LayerKind, LayerSpec, MapEvent, MapEventKind, MapOptions, MapSurface, SourceSpec, Teardown,
};
use crate::marker::{FrameCoalescer, MarkerLayer, ReconcileReport};
use crate::notice::{Notice, Notifier};
use crate::poi::{DisabledSet, Poi, PoiCatalogue, Progress};
use crate::proximity::{ArMarkerData, ArPrefetch, Proximity, ProximityMonitor};
use crate::route::{Directions, RouteOutcome, RouteRequest, RoutingCoordinator};
use crate::track::{Fix, GeolocationProvider, LocationError, LocationTracker, NoiseFilter};

pub const MARKER_SOURCE: &str = "waymark-pois";
pub const CLUSTER_LAYER: &str = "waymark-clusters";
pub const CLUSTER_COUNT_LAYER: &str = "waymark-cluster-count";
pub const BUILDINGS_LAYER: &str = "waymark-3d-buildings";

const SUBSCRIBED: [MapEventKind; 5] = [
    MapEventKind::Move,
    MapEventKind::Zoom,
    MapEventKind::SourceData,
    MapEventKind::Idle,
    MapEventKind::Error,
];

/// External collaborators a session talks to, besides the map.
pub struct Collaborators<D, G> {
    pub directions: D,
    pub geolocation: G,
    pub notifier: Box<dyn Notifier>,
    pub prefetch: Box<dyn ArPrefetch>,
}

struct SessionState<H> {
    walk_mode: bool,
    location: Option<Point>,
    disabled: DisabledSet,
    proximity: Proximity,
    monitor: ProximityMonitor,
    markers: MarkerLayer<H>,
    frame: FrameCoalescer,
    tracker: LocationTracker,
    attached: bool,
    completed: bool,
}

pub struct WalkSession<M: MapSurface, D, G> {
    config: Config,
    catalogue: PoiCatalogue,
    map: RefCell<M>,
    state: RefCell<SessionState<M::Marker>>,
    teardown: RefCell<Teardown<M>>,
    router: RoutingCoordinator<D>,
    geolocation: G,
    notifier: Box<dyn Notifier>,
    prefetch: Box<dyn ArPrefetch>,
}

impl<M, D, G> WalkSession<M, D, G>
where
    M: MapSurface + 'static,
    D: Directions,
    G: GeolocationProvider,
{
    pub fn new(
        config: Config,
        catalogue: PoiCatalogue,
        map: M,
        collaborators: Collaborators<D, G>,
    ) -> crate::Result<Self> {
        config.validate()?;

        let Collaborators {
            directions,
            geolocation,
            notifier,
            prefetch,
        } = collaborators;

        let filter = NoiseFilter::new(config.min_displacement_m, config.min_fix_interval());
        let state = SessionState {
            walk_mode: false,
            location: None,
            disabled: DisabledSet::new(),
            proximity: Proximity::default(),
            monitor: ProximityMonitor::new(config.arrival_radius_m),
            markers: MarkerLayer::new(),
            frame: FrameCoalescer::default(),
            tracker: LocationTracker::new(filter),
            attached: false,
            completed: false,
        };

        Ok(WalkSession {
            router: RoutingCoordinator::new(directions, &config),
            config,
            catalogue,
            map: RefCell::new(map),
            state: RefCell::new(state),
            teardown: RefCell::new(Teardown::new()),
            geolocation,
            notifier,
            prefetch,
        })
    }

    fn layers(&self) -> Vec<LayerSpec> {
        vec![
            LayerSpec::new(CLUSTER_LAYER, MARKER_SOURCE, LayerKind::Circle)
                .filter(json!(["has", "point_count"]))
                .paint(json!({
                    "circle-color": "#f97316",
                    "circle-radius": ["step", ["get", "point_count"], 18, 5, 24, 10, 30],
                    "circle-stroke-width": 2,
                    "circle-stroke-color": "#ffffff",
                })),
            LayerSpec::new(CLUSTER_COUNT_LAYER, MARKER_SOURCE, LayerKind::Symbol)
                .filter(json!(["has", "point_count"]))
                .layout(json!({
                    "text-field": ["get", "point_count_abbreviated"],
                    "text-size": 13,
                })),
            LayerSpec::new(BUILDINGS_LAYER, "composite", LayerKind::FillExtrusion)
                .source_layer("building")
                .filter(json!(["==", "extrude", "true"]))
                .paint(json!({
                    "fill-extrusion-color": "#d6d3d1",
                    "fill-extrusion-height": ["get", "height"],
                    "fill-extrusion-base": ["get", "min_height"],
                    "fill-extrusion-opacity": 0.6,
                })),
        ]
    }

    /// Installs the marker source, its layers and the map listeners, and
    /// records how to undo each step. Calling it again is a no-op.
    ///
    /// Only a failure to add the marker source is returned; layers that
    /// cannot be added are logged and skipped.
    pub fn attach(&self) -> crate::Result<()> {
        {
            let mut state = self.state.borrow_mut();
            if state.attached {
                debug!("Session already attached");
                return Ok(());
            }

            let mut map = self.map.borrow_mut();
            let mut teardown = self.teardown.borrow_mut();

            let cluster = self.config.cluster.enabled.then_some(self.config.cluster);
            map.add_source(
                MARKER_SOURCE,
                SourceSpec::GeoJson {
                    data: self.catalogue.feature_collection(),
                    cluster,
                },
            )?;
            teardown.push("remove marker source", |map: &mut M| {
                if let Err(error) = map.remove_source(MARKER_SOURCE) {
                    warn!("Could not remove marker source: {error}");
                }
            });

            for layer in self.layers() {
                let id = layer.id.clone();
                match map.add_layer(layer) {
                    Ok(()) => teardown.push("remove layer", move |map: &mut M| {
                        if let Err(error) = map.remove_layer(&id) {
                            warn!("Could not remove layer {id:?}: {error}");
                        }
                    }),
                    Err(error) => warn!("Skipping layer {id:?}: {error}"),
                }
            }

            for kind in SUBSCRIBED {
                let listener = map.subscribe(kind);
                teardown.push("unsubscribe", move |map: &mut M| map.unsubscribe(listener));
            }

            state.tracker.reset_recentre();
            state.attached = true;

            info!(
                "Attached {} destinations with {} cleanup actions",
                self.catalogue.total(),
                teardown.len()
            );
        }

        self.request_reconcile();
        Ok(())
    }

    /// Routes a map event. Returns whether an animation frame should be
    /// scheduled for reconciliation.
    pub fn handle_event(&self, event: &MapEvent) -> bool {
        match event {
            MapEvent::Load | MapEvent::Move | MapEvent::Zoom => self.request_reconcile(),
            MapEvent::SourceData { source } if source == MARKER_SOURCE => self.request_reconcile(),
            MapEvent::SourceData { .. } | MapEvent::Click { .. } => false,
            MapEvent::Idle => {
                debug!("Map idle");
                false
            }
            MapEvent::Error { message } => {
                error!("Map engine error: {message}");
                false
            }
        }
    }

    /// Handles the map's `idle` event: schedules reconciliation and replays
    /// a route request deferred while the style was loading.
    pub async fn on_idle(&self) -> Option<RouteOutcome> {
        self.request_reconcile();

        let request = self.router.take_deferred()?;
        info!("Replaying deferred route request");

        Some(
            self.router
                .request_route(&self.map, self.notifier.as_ref(), request)
                .await,
        )
    }

    /// Marks reconciliation as pending. Returns `true` only when the host
    /// must schedule an animation frame.
    pub fn request_reconcile(&self) -> bool {
        self.state.borrow_mut().frame.trigger()
    }

    /// Runs the pending reconciliation pass, if any, reading the
    /// disabled-set and walk mode as they are now.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::DEBUG, skip_all))]
    pub fn on_animation_frame(&self) -> Option<ReconcileReport> {
        let mut state = self.state.borrow_mut();
        if !state.frame.take() {
            return None;
        }

        let mut map = self.map.borrow_mut();
        let Some(features) = map.query_source_features(MARKER_SOURCE) else {
            debug!("Marker source not available yet, skipping reconciliation");
            return None;
        };

        let SessionState {
            markers,
            disabled,
            walk_mode,
            ..
        } = &mut *state;

        Some(markers.reconcile(&mut *map, &features, disabled, *walk_mode))
    }

    /// Re-evaluates proximity from the current location, disabled-set and
    /// walk mode.
    pub fn refresh_proximity(&self) -> Proximity {
        let mut state = self.state.borrow_mut();
        let SessionState {
            monitor,
            location,
            disabled,
            walk_mode,
            proximity,
            ..
        } = &mut *state;

        *proximity = monitor.evaluate(
            *location,
            &self.catalogue,
            disabled,
            *walk_mode,
            self.prefetch.as_ref(),
        );

        proximity.clone()
    }

    pub fn start_tracking(&self) -> Result<(), LocationError> {
        let started = self
            .state
            .borrow_mut()
            .tracker
            .start(&self.geolocation, &self.config.geolocation);

        started.map(|_| ()).inspect_err(|error| {
            warn!("Could not start location tracking: {error}");
            self.notifier.notify(Notice::Location(*error));
        })
    }

    pub fn stop_tracking(&self) -> bool {
        self.state.borrow_mut().tracker.stop(&self.geolocation)
    }

    /// Starts a walk: markers become interactive and arrival is tracked.
    ///
    /// Walk mode stays on when tracking cannot start; the walker may retry
    /// with [`WalkSession::start_tracking`].
    pub fn enter_walk_mode(&self) -> Result<(), LocationError> {
        self.state.borrow_mut().walk_mode = true;
        info!("Walk mode entered");

        let started = self.start_tracking();

        self.refresh_proximity();
        self.request_reconcile();
        started
    }

    /// Ends a walk: tracking stops, the route is cleared and, under
    /// [`DisabledPolicy::ResetOnExit`], consumed POIs become active again.
    pub fn exit_walk_mode(&self) {
        self.stop_tracking();

        {
            let mut state = self.state.borrow_mut();
            state.walk_mode = false;

            if self.config.disabled_policy == DisabledPolicy::ResetOnExit {
                state.disabled.clear();
                state.completed = false;
            }
        }

        self.router.invalidate();
        self.router.clear_route(&mut *self.map.borrow_mut());

        self.refresh_proximity();
        self.request_reconcile();
        info!("Walk mode exited");
    }

    /// Clears the disabled-set regardless of policy.
    pub fn reset_progress(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.disabled.clear();
            state.completed = false;
        }

        self.refresh_proximity();
        self.request_reconcile();
    }

    /// Feeds a watched fix. Returns whether it passed the noise filter.
    pub fn on_fix(&self, fix: Fix) -> bool {
        let accepted = {
            let mut state = self.state.borrow_mut();
            if !state.tracker.is_running() {
                debug!("Ignoring fix delivered without an active watch");
                return false;
            }

            let accepted = state.tracker.on_fix(fix);
            if let Some(accepted) = &accepted {
                state.location = Some(accepted.fix.position);
            }
            accepted
        };

        let Some(accepted) = accepted else {
            return false;
        };

        if accepted.recentre {
            debug!("Centring map on first fix");
            self.map.borrow_mut().ease_to(accepted.fix.position);
        }

        self.refresh_proximity();
        true
    }

    pub fn on_location_error(&self, error: LocationError) {
        let error = self.state.borrow().tracker.on_error(error);
        self.notifier.notify(Notice::Location(error));
    }

    /// One-shot positioning. The fix bypasses the noise filter and becomes
    /// its new baseline.
    pub async fn locate_once(&self) -> Result<Point, LocationError> {
        let result = self
            .geolocation
            .current_position(&self.config.geolocation)
            .await;

        match result {
            Ok(fix) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.tracker.adopt(&fix);
                    state.location = Some(fix.position);
                }

                self.refresh_proximity();
                Ok(fix.position)
            }
            Err(error) => {
                warn!("One-shot positioning failed: {error}");
                self.notifier.notify(Notice::Location(error));
                Err(error)
            }
        }
    }

    /// Requests a walking route from the departure point to `destination`.
    /// The departure point itself is never a destination.
    pub fn request_route(&self, destination: Point) -> impl Future<Output = RouteOutcome> + '_ {
        let departure = self.catalogue.departure();

        let pending = if departure.key() == CoordinateKey::from(destination) {
            warn!("Refusing to route to the departure point {:?}", departure.id);
            None
        } else {
            let request = RouteRequest {
                origin: departure.position,
                destination,
            };

            Some(
                self.router
                    .request_route(&self.map, self.notifier.as_ref(), request),
            )
        };

        async move {
            match pending {
                Some(pending) => pending.await,
                None => RouteOutcome::Rejected,
            }
        }
    }

    /// Removes the drawn route, if any.
    pub fn clear_route(&self) -> bool {
        self.router.clear_route(&mut *self.map.borrow_mut())
    }

    /// Handles a click on a rendered marker. Returns the route request when
    /// the marker is an interactive destination.
    pub fn on_marker_click(
        &self,
        position: Point,
    ) -> Option<impl Future<Output = RouteOutcome> + '_> {
        let key = CoordinateKey::from(position);
        let Some(poi) = self.catalogue.find_by_key(key) else {
            debug!("Click on unknown marker {key}");
            return None;
        };

        {
            let state = self.state.borrow();
            let interactive = state
                .markers
                .state_of(&key)
                .is_some_and(|marker| marker.interactive);

            if !interactive || state.disabled.contains(&poi.id) {
                debug!("Ignoring click on inactive marker {:?}", poi.id);
                return None;
            }
        }

        info!("Routing to {:?}", poi.id);
        Some(self.request_route(poi.position))
    }

    /// Opens the AR overlay for the destination the walker has arrived at,
    /// consuming it. Returns `None` when nothing is in range.
    pub fn open_ar(&self) -> Option<ArMarkerData> {
        let proximity = self.refresh_proximity();
        if !proximity.in_range {
            return None;
        }

        let poi = self.catalogue.get(&proximity.nearest?.poi_id)?;
        let progress = {
            let mut state = self.state.borrow_mut();
            state.disabled.insert(&poi.id);
            Progress::of(&state.disabled, &self.catalogue)
        };

        info!(
            "Opened AR for {:?} ({}/{} visited)",
            poi.id, progress.disabled, progress.total
        );

        self.router.invalidate();
        self.router.clear_route(&mut *self.map.borrow_mut());

        self.refresh_proximity();
        self.request_reconcile();

        if progress.is_complete() {
            let first = !std::mem::replace(&mut self.state.borrow_mut().completed, true);
            if first {
                self.notifier.notify(Notice::WalkComplete);
            }
        }

        Some(ArMarkerData::from(poi))
    }

    pub fn catalogue(&self) -> &PoiCatalogue {
        &self.catalogue
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Options the host should create its map with. Without a configured
    /// centre, the map opens on the departure point.
    pub fn map_options(&self) -> MapOptions {
        let departure = self.catalogue.departure().position;
        let mut options = self.config.map.clone();
        options.center.get_or_insert([departure.x(), departure.y()]);
        options
    }

    pub fn proximity(&self) -> Proximity {
        self.state.borrow().proximity.clone()
    }

    pub fn nearest_poi(&self) -> Option<&Poi> {
        let id = self.state.borrow().proximity.nearest.as_ref()?.poi_id.clone();
        self.catalogue.get(&id)
    }

    pub fn show_ar_button(&self) -> bool {
        self.state.borrow().proximity.show_ar_button()
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.state.borrow().disabled, &self.catalogue)
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.state.borrow().disabled.contains(id)
    }

    pub fn location(&self) -> Option<Point> {
        self.state.borrow().location
    }

    pub fn walk_mode(&self) -> bool {
        self.state.borrow().walk_mode
    }

    pub fn is_tracking(&self) -> bool {
        self.state.borrow().tracker.is_running()
    }

    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    pub fn latest_route_token(&self) -> u64 {
        self.router.latest_token()
    }

    /// Shuts the session down and hands the released map back: drops the
    /// pending frame, stops tracking, invalidates and clears the route,
    /// destroys every marker, runs the cleanup list newest first and
    /// releases the engine.
    pub fn teardown(self) -> M {
        let WalkSession {
            map,
            state,
            teardown,
            router,
            geolocation,
            ..
        } = self;

        let mut map = map.into_inner();
        let mut state = state.into_inner();

        if state.frame.cancel() {
            debug!("Cancelled pending reconciliation frame");
        }

        state.tracker.stop(&geolocation);

        router.invalidate();
        router.clear_route(&mut map);

        let markers = state.markers.clear(&mut map);
        let actions = teardown.into_inner().run(&mut map);

        map.release();
        info!("Session torn down: {markers} markers destroyed, {actions} cleanup actions run");

        map
    }
}
