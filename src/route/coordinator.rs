use std::cell::{Cell, RefCell};
use std::future::Future;
use std::iter::once;

use geo::{LineString, Point};
use log::{debug, error, info, warn};
use serde_json::{Value, json};
use waymark_geo::{bounds, collapse_vertices};
use wkt::ToWkt;

use crate::config::{Config, RouteStyle};
use crate::map::{LayerKind, LayerSpec, MapSurface, SourceSpec};
use crate::notice::{Notice, Notifier};
use crate::route::{Directions, DirectionsRoute, Generation, RouteError, Token};

pub const ROUTE_SOURCE: &str = "waymark-route";
pub const ROUTE_LAYER: &str = "waymark-route-line";

/// A walk from `origin` to `destination`, held by value so a deferred
/// request replays exactly what was asked for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteRequest {
    pub origin: Point,
    pub destination: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The route was drawn, with this many vertices after collapsing.
    Applied { token: Token, vertices: usize },
    /// A newer request was issued before this one completed.
    Stale { token: Token },
    /// The service found no route; the displayed route is untouched.
    NotFound { token: Token },
    /// The request or drawing failed; the displayed route is untouched.
    Failed { token: Token },
    /// The map style is still loading; the request waits for `idle`.
    Deferred,
    /// The destination was refused before any request was issued.
    Rejected,
}

/// Issues directions requests and keeps at most one route on the map,
/// always the one from the latest issued request that completed.
pub struct RoutingCoordinator<D> {
    directions: D,
    generation: Generation,
    deferred: Cell<Option<RouteRequest>>,
    vertex_epsilon: f64,
    fit_padding: u32,
    style: RouteStyle,
}

impl<D: Directions> RoutingCoordinator<D> {
    pub fn new(directions: D, config: &Config) -> Self {
        RoutingCoordinator {
            directions,
            generation: Generation::default(),
            deferred: Cell::new(None),
            vertex_epsilon: config.route_vertex_epsilon,
            fit_padding: config.fit_padding_px,
            style: config.route_style.clone(),
        }
    }

    pub fn latest_token(&self) -> Token {
        self.generation.current()
    }

    pub fn has_deferred(&self) -> bool {
        self.deferred.get().is_some()
    }

    /// Requests a route. The token is issued when this is called, not when
    /// the returned future is first polled, so responses are ordered by
    /// call order.
    ///
    /// No `RefCell` borrow is held across the network await.
    pub fn request_route<'a, M, N>(
        &'a self,
        map: &'a RefCell<M>,
        notifier: &'a N,
        request: RouteRequest,
    ) -> impl Future<Output = RouteOutcome> + 'a
    where
        M: MapSurface,
        N: Notifier + ?Sized,
    {
        let ticket = if map.borrow().is_style_loaded() {
            self.deferred.set(None);
            Some(self.generation.issue())
        } else {
            info!("Map style not loaded, deferring route request until idle");
            self.deferred.set(Some(request));
            None
        };

        async move {
            let Some(token) = ticket else {
                return RouteOutcome::Deferred;
            };

            debug!("Route request #{token} issued");
            let response = self
                .directions
                .walking(request.origin, request.destination)
                .await;

            if !self.generation.is_current(token) {
                debug!(
                    "Discarding stale route response #{token}, latest is #{}",
                    self.generation.current()
                );
                return RouteOutcome::Stale { token };
            }

            let destination = request.destination;
            match response {
                Ok(response) => match response.best() {
                    Some(route) => {
                        let outcome = self.draw(&mut *map.borrow_mut(), token, request, route);
                        if let RouteOutcome::Failed { .. } = outcome {
                            notifier.notify(Notice::RoutingFailed);
                        }
                        outcome
                    }
                    None => {
                        warn!(
                            "Route #{token} not found, service answered {:?} with {} routes",
                            response.code,
                            response.routes.len()
                        );
                        notifier.notify(route_not_found(destination));
                        RouteOutcome::NotFound { token }
                    }
                },
                Err(RouteError::Status(status)) => {
                    warn!("Route #{token} not found, service answered with status {status}");
                    notifier.notify(route_not_found(destination));
                    RouteOutcome::NotFound { token }
                }
                Err(error) => {
                    error!("Route #{token} failed: {error}");
                    notifier.notify(Notice::RoutingFailed);
                    RouteOutcome::Failed { token }
                }
            }
        }
    }

    /// Takes the request deferred while the style was loading, if any.
    pub fn take_deferred(&self) -> Option<RouteRequest> {
        self.deferred.take()
    }

    /// Makes every in-flight request stale and drops any deferred one.
    pub fn invalidate(&self) -> Token {
        self.deferred.set(None);
        self.generation.issue()
    }

    /// Removes the drawn route, if any. Returns whether anything was removed.
    pub fn clear_route<M: MapSurface>(&self, map: &mut M) -> bool {
        let mut removed = false;

        if map.has_layer(ROUTE_LAYER) {
            match map.remove_layer(ROUTE_LAYER) {
                Ok(()) => removed = true,
                Err(error) => warn!("Could not remove route layer: {error}"),
            }
        }

        if map.has_source(ROUTE_SOURCE) {
            match map.remove_source(ROUTE_SOURCE) {
                Ok(()) => removed = true,
                Err(error) => warn!("Could not remove route source: {error}"),
            }
        }

        removed
    }

    fn line_layer(&self) -> LayerSpec {
        LayerSpec::new(ROUTE_LAYER, ROUTE_SOURCE, LayerKind::Line)
            .layout(json!({ "line-join": "round", "line-cap": "round" }))
            .paint(json!({
                "line-color": self.style.color,
                "line-width": self.style.width,
                "line-opacity": self.style.opacity,
            }))
    }

    /// Replaces whatever route is on the map. Source and layer ids are fixed,
    /// so the previous route is removed first: a draw the map refuses leaves
    /// no route at all, never a partial one.
    fn draw<M: MapSurface>(
        &self,
        map: &mut M,
        token: Token,
        request: RouteRequest,
        route: &DirectionsRoute,
    ) -> RouteOutcome {
        let coords = once(request.origin.0)
            .chain(route.geometry.coords())
            .chain(once(request.destination.0));

        let line = collapse_vertices(coords, self.vertex_epsilon);
        debug!("Drawing route #{token}: {}", line.wkt_string());

        self.clear_route(map);

        let source = SourceSpec::GeoJson {
            data: line_feature(&line),
            cluster: None,
        };

        if let Err(error) = map.add_source(ROUTE_SOURCE, source) {
            error!("Could not add route source for #{token}: {error}");
            return RouteOutcome::Failed { token };
        }

        if let Err(error) = map.add_layer(self.line_layer()) {
            error!("Could not add route layer for #{token}: {error}");
            if let Err(error) = map.remove_source(ROUTE_SOURCE) {
                warn!("Could not roll back route source: {error}");
            }
            return RouteOutcome::Failed { token };
        }

        if let Some(rect) = bounds(&line) {
            map.fit_bounds(rect, self.fit_padding);
        }

        info!(
            "Route #{token} drawn: {} vertices, {:.0}m, {:.0}s",
            line.0.len(),
            route.distance,
            route.duration
        );

        RouteOutcome::Applied {
            token,
            vertices: line.0.len(),
        }
    }
}

fn route_not_found(destination: Point) -> Notice {
    Notice::RouteNotFound { destination }
}

fn line_feature(line: &LineString) -> Value {
    json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "LineString",
            "coordinates": line.0.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>(),
        },
    })
}
