use log::{debug, info, warn};
#[cfg(feature = "tracing")]
use tracing::Level;

use crate::track::{Fix, GeolocationOptions, GeolocationProvider, LocationError, NoiseFilter, WatchId};

/// A fix that passed the noise filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Accepted {
    pub fix: Fix,
    /// Set on the first accepted fix of a map session; the map should be
    /// centred on it once.
    pub recentre: bool,
}

/// Owns the platform watch subscription and the noise filter.
#[derive(Debug)]
pub struct LocationTracker {
    filter: NoiseFilter,
    watch: Option<WatchId>,
    recentred: bool,
}

impl LocationTracker {
    pub fn new(filter: NoiseFilter) -> Self {
        LocationTracker {
            filter,
            watch: None,
            recentred: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.watch.is_some()
    }

    pub fn watch(&self) -> Option<WatchId> {
        self.watch
    }

    pub fn filter(&self) -> &NoiseFilter {
        &self.filter
    }

    /// Starts watching, replacing any subscription already held. The first
    /// fix of the new watch is always admitted.
    pub fn start<G>(&mut self, provider: &G, options: &GeolocationOptions) -> Result<WatchId, LocationError>
    where
        G: GeolocationProvider + ?Sized,
    {
        if self.stop(provider) {
            debug!("Replaced an existing location watch");
        }

        let watch = provider.watch_position(options)?;
        info!("Location watch {watch:?} started");

        self.filter.reset();

        self.watch = Some(watch);
        Ok(watch)
    }

    /// Cancels the subscription. Returns whether one was running.
    pub fn stop<G>(&mut self, provider: &G) -> bool
    where
        G: GeolocationProvider + ?Sized,
    {
        match self.watch.take() {
            Some(watch) => {
                provider.clear_watch(watch);
                info!("Location watch {watch:?} stopped");
                true
            }
            None => false,
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = Level::TRACE, skip(self)))]
    pub fn on_fix(&mut self, fix: Fix) -> Option<Accepted> {
        if !self.filter.admit(&fix) {
            return None;
        }

        let recentre = !std::mem::replace(&mut self.recentred, true);
        Some(Accepted { fix, recentre })
    }

    /// Records a failure. The subscription stays as it is; retrying is
    /// the caller's decision.
    pub fn on_error(&self, error: LocationError) -> LocationError {
        warn!("Location watch {:?} reported {error}", self.watch);
        error
    }

    /// Makes a one-shot fix the filter's baseline.
    pub fn adopt(&mut self, fix: &Fix) {
        self.filter.rebase(fix);
    }

    /// Re-arms the one-time recentre for a new map session.
    pub fn reset_recentre(&mut self) {
        self.recentred = false;
    }
}
