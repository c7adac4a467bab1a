use async_trait::async_trait;
use geo::{Coord, Point, coord};
use serde::Deserialize;

use crate::route::RouteError;

/// Body of a directions response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DirectionsResponse {
    pub code: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: RouteGeometry,
    /// Meters.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RouteGeometry {
    /// `[lng, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteGeometry {
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coordinates.iter().map(|[x, y]| coord! { x: *x, y: *y })
    }
}

impl DirectionsResponse {
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// The route to draw: the first candidate of a successful response.
    pub fn best(&self) -> Option<&DirectionsRoute> {
        if !self.is_ok() {
            return None;
        }

        self.routes.first()
    }
}

/// An external walking-directions service.
#[async_trait(?Send)]
pub trait Directions {
    async fn walking(&self, origin: Point, destination: Point) -> Result<DirectionsResponse, RouteError>;
}
