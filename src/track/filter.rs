use std::time::Duration;

use log::trace;
use waymark_geo::haversine;

use crate::track::Fix;

/// Displacement/interval gate over incoming fixes.
///
/// A fix is admitted when it moved at least `min_displacement_m` from the
/// last admitted fix, or when at least `min_interval` passed since it. The
/// first fix is always admitted. Rejected fixes leave no trace.
#[derive(Clone, Debug)]
pub struct NoiseFilter {
    min_displacement_m: f64,
    min_interval: Duration,
    last: Option<Fix>,
}

impl NoiseFilter {
    pub fn new(min_displacement_m: f64, min_interval: Duration) -> Self {
        NoiseFilter {
            min_displacement_m,
            min_interval,
            last: None,
        }
    }

    pub fn last(&self) -> Option<&Fix> {
        self.last.as_ref()
    }

    pub fn admit(&mut self, fix: &Fix) -> bool {
        let admitted = match &self.last {
            None => true,
            Some(last) => {
                let moved = haversine(last.position, fix.position);
                // Fixes stamped before the baseline count as no time passing
                let elapsed = (fix.timestamp - last.timestamp)
                    .to_std()
                    .unwrap_or(Duration::ZERO);

                trace!("Fix moved {moved:.2}m after {elapsed:?}");
                moved >= self.min_displacement_m || elapsed >= self.min_interval
            }
        };

        if admitted {
            self.last = Some(*fix);
        }

        admitted
    }

    /// Replaces the baseline without filtering.
    pub fn rebase(&mut self, fix: &Fix) {
        self.last = Some(*fix);
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
