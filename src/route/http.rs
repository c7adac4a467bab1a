//! Directions over HTTP, for services speaking the Mapbox Directions API
//! (`/directions/v5/{owner}/{profile}/{coordinates}`), which includes
//! self-hosted OSRM deployments behind a compatible path.

use async_trait::async_trait;
use geo::Point;
use log::debug;
use reqwest::Client;

use crate::config::DirectionsConfig;
use crate::route::{Directions, DirectionsResponse, RouteError};

#[derive(Debug, Clone)]
pub struct HttpDirections {
    client: Client,
    base_url: String,
    profile: String,
    access_token: String,
}

impl HttpDirections {
    pub fn new(config: &DirectionsConfig) -> Result<Self, RouteError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|error| RouteError::Transport(error.to_string()))?;

        Ok(HttpDirections {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Request URL without the query string.
    pub fn url(&self, origin: Point, destination: Point) -> String {
        format!(
            "{}/directions/v5/mapbox/{}/{},{};{},{}",
            self.base_url,
            self.profile,
            origin.x(),
            origin.y(),
            destination.x(),
            destination.y()
        )
    }
}

#[async_trait(?Send)]
impl Directions for HttpDirections {
    async fn walking(&self, origin: Point, destination: Point) -> Result<DirectionsResponse, RouteError> {
        let url = self.url(origin, destination);
        debug!("Requesting directions from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("geometries", "geojson"),
                ("overview", "full"),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|error| RouteError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::Status(status.as_u16()));
        }

        response
            .json::<DirectionsResponse>()
            .await
            .map_err(|error| RouteError::Decode(error.to_string()))
    }
}
