//! Tunables for a walk session.
//!
//! Every field has a default, so an empty JSON document (or an empty
//! environment) yields a usable [`Config`]. Hosts usually call
//! [`Config::from_env`], which reads a `.env` file first and then applies
//! `WAYMARK_*` overrides:
//!
//! ```bash
//! WAYMARK_ARRIVAL_RADIUS_M=100
//! WAYMARK_MIN_DISPLACEMENT_M=5
//! WAYMARK_MIN_FIX_INTERVAL_MS=800
//! WAYMARK_DIRECTIONS_URL=https://api.mapbox.com
//! WAYMARK_DIRECTIONS_TOKEN=<access-token>
//! WAYMARK_DISABLED_POLICY=reset_on_exit
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use log::debug;
use serde::Deserialize;

use crate::map::{ClusterOptions, MapOptions};
use crate::track::GeolocationOptions;


/// What happens to the disabled-set when a walk ends.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, strum::EnumString, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisabledPolicy {
    /// Cleared by `exit_walk_mode`.
    #[default]
    ResetOnExit,
    /// Kept across walks until progress is reset explicitly.
    Persist,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub profile: String,
    pub access_token: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        DirectionsConfig {
            base_url: "https://api.mapbox.com".to_string(),
            profile: "walking".to_string(),
            access_token: String::new(),
            timeout_secs: 10,
        }
    }
}

impl DirectionsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl Default for RouteStyle {
    fn default() -> Self {
        RouteStyle {
            color: "#3b82f6".to_string(),
            width: 5.0,
            opacity: 0.85,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distance, in meters, at which a walker has arrived at a POI.
    pub arrival_radius_m: f64,
    /// Displacement that always admits a location fix.
    pub min_displacement_m: f64,
    /// Interval that always admits a location fix.
    pub min_fix_interval_ms: u64,
    /// Route vertices closer than this (in degrees) to their predecessor are dropped.
    pub route_vertex_epsilon: f64,
    pub fit_padding_px: u32,
    pub route_style: RouteStyle,
    pub cluster: ClusterOptions,
    pub geolocation: GeolocationOptions,
    pub directions: DirectionsConfig,
    pub disabled_policy: DisabledPolicy,
    pub map: MapOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arrival_radius_m: 100.0,
            min_displacement_m: 5.0,
            min_fix_interval_ms: 800,
            route_vertex_epsilon: 1e-5,
            fit_padding_px: 60,
            route_style: RouteStyle::default(),
            cluster: ClusterOptions::default(),
            geolocation: GeolocationOptions::default(),
            directions: DirectionsConfig::default(),
            disabled_policy: DisabledPolicy::default(),
            map: MapOptions::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidVariable { key: &'static str, value: String },
    Parse(serde_json::Error),
    OutOfRange(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidVariable { key, value } => {
                write!(f, "invalid value for {key}: {value:?}")
            }
            ConfigError::Parse(error) => write!(f, "invalid configuration document: {error}"),
            ConfigError::OutOfRange(reason) => write!(f, "configuration out of range: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        ConfigError::Parse(value)
    }
}

fn lookup<T: FromStr>(
    vars: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match vars(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVariable { key, value }),
    }
}

impl Config {
    pub fn min_fix_interval(&self) -> Duration {
        Duration::from_millis(self.min_fix_interval_ms)
    }

    /// Loads `.env` (if present), then applies `WAYMARK_*` overrides from
    /// the process environment on top of the defaults.
    pub fn from_env() -> Result<Config, ConfigError> {
        if let Err(error) = dotenv() {
            debug!("No .env file loaded: {error}");
        }

        Config::from_vars(|key| std::env::var(key).ok())
    }

    /// Applies `WAYMARK_*` overrides read through `vars` on top of the
    /// defaults.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        if let Some(radius) = lookup(&vars, "WAYMARK_ARRIVAL_RADIUS_M")? {
            config.arrival_radius_m = radius;
        }
        if let Some(displacement) = lookup(&vars, "WAYMARK_MIN_DISPLACEMENT_M")? {
            config.min_displacement_m = displacement;
        }
        if let Some(interval) = lookup(&vars, "WAYMARK_MIN_FIX_INTERVAL_MS")? {
            config.min_fix_interval_ms = interval;
        }
        if let Some(url) = lookup::<String>(&vars, "WAYMARK_DIRECTIONS_URL")? {
            config.directions.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(token) = lookup(&vars, "WAYMARK_DIRECTIONS_TOKEN")? {
            config.directions.access_token = token;
        }
        if let Some(policy) = lookup(&vars, "WAYMARK_DISABLED_POLICY")? {
            config.disabled_policy = policy;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json(document: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arrival_radius_m", self.arrival_radius_m),
            ("min_displacement_m", self.min_displacement_m),
            ("route_vertex_epsilon", self.route_vertex_epsilon),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange(format!(
                    "{name} must be a positive number. Given: {value}"
                )));
            }
        }

        if self.directions.base_url.is_empty() {
            return Err(ConfigError::OutOfRange(
                "directions.base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
