use std::fmt::{Display, Formatter};

use waymark_geo::GeoError;

use crate::config::ConfigError;
use crate::impl_err;
use crate::map::MapError;
use crate::poi::PoiError;
use crate::route::RouteError;
use crate::track::LocationError;

#[derive(Debug)]
pub enum Error {
    Geo(GeoError),
    Poi(PoiError),
    Map(MapError),
    Route(RouteError),
    Location(LocationError),
    Config(ConfigError),
}

impl_err!(GeoError, Geo);
impl_err!(PoiError, Poi);
impl_err!(MapError, Map);
impl_err!(RouteError, Route);
impl_err!(LocationError, Location);
impl_err!(ConfigError, Config);

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Geo(error) => write!(f, "{error}"),
            Error::Poi(error) => write!(f, "{error}"),
            Error::Map(error) => write!(f, "{error}"),
            Error::Route(error) => write!(f, "{error}"),
            Error::Location(error) => write!(f, "{error}"),
            Error::Config(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
