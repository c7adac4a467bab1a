use std::time::Duration;

use crate::testing::{FakeGeolocation, fix, north_of};
use crate::track::{GeolocationOptions, LocationError, LocationTracker, NoiseFilter, WatchId};

const LNG: f64 = 127.1500;
const LAT: f64 = 35.8150;

fn filter() -> NoiseFilter {
    NoiseFilter::new(5.0, Duration::from_millis(800))
}

fn tracker() -> LocationTracker {
    LocationTracker::new(filter())
}

#[test_log::test]
fn jitter_is_dropped_until_interval_passes() {
    let mut filter = filter();
    let nearby = north_of(geo::Point::new(LNG, LAT), 2.0);

    assert!(filter.admit(&fix(LNG, LAT, 0)));
    assert!(!filter.admit(&fix(nearby.x(), nearby.y(), 200)));
    assert!(filter.admit(&fix(nearby.x(), nearby.y(), 900)));
    assert!(!filter.admit(&fix(nearby.x(), nearby.y(), 950)));

    assert_eq!(filter.last(), Some(&fix(nearby.x(), nearby.y(), 900)));
}

#[test_log::test]
fn still_then_moving_walker() {
    let mut filter = filter();
    let moved = north_of(geo::Point::new(LNG, LAT), 6.0);

    assert!(filter.admit(&fix(LNG, LAT, 0)));
    assert!(!filter.admit(&fix(LNG, LAT, 200)));
    assert!(filter.admit(&fix(LNG, LAT, 900)));
    assert!(filter.admit(&fix(moved.x(), moved.y(), 950)));
}

#[test_log::test]
fn displacement_admits_immediately() {
    let mut filter = filter();
    let far = north_of(geo::Point::new(LNG, LAT), 6.0);

    assert!(filter.admit(&fix(LNG, LAT, 0)));
    assert!(filter.admit(&fix(far.x(), far.y(), 10)));
}

#[test_log::test]
fn rejected_fixes_do_not_move_the_baseline() {
    let mut filter = filter();
    let origin = geo::Point::new(LNG, LAT);

    assert!(filter.admit(&fix(LNG, LAT, 0)));

    // Creeping 3m at a time never adds up, each hop is measured from the origin
    let three = north_of(origin, 3.0);
    assert!(!filter.admit(&fix(three.x(), three.y(), 100)));

    let six = north_of(origin, 6.0);
    assert!(filter.admit(&fix(six.x(), six.y(), 200)));
    assert_eq!(filter.last().map(|last| last.position), Some(six));
}

#[test_log::test]
fn backdated_fix_counts_as_no_time_passing() {
    let mut filter = filter();

    assert!(filter.admit(&fix(LNG, LAT, 10_000)));
    assert!(!filter.admit(&fix(LNG, LAT, 0)));
    assert!(filter.admit(&fix(LNG, LAT, 10_800)));
}

#[test_log::test]
fn reset_admits_the_next_fix() {
    let mut filter = filter();

    assert!(filter.admit(&fix(LNG, LAT, 0)));
    filter.reset();
    assert!(filter.last().is_none());
    assert!(filter.admit(&fix(LNG, LAT, 1)));
}

#[test_log::test]
fn restarting_never_leaves_two_watches() {
    let provider = FakeGeolocation::default();
    let options = GeolocationOptions::default();
    let mut tracker = tracker();

    let first = tracker.start(&provider, &options).expect("Watch must start");
    let second = tracker.start(&provider, &options).expect("Watch must restart");

    assert_ne!(first, second);
    assert_eq!(*provider.active.borrow(), vec![second]);
    assert_eq!(*provider.cleared.borrow(), vec![first]);

    assert!(tracker.stop(&provider));
    assert!(!tracker.stop(&provider));
    assert!(provider.active.borrow().is_empty());
    assert!(!tracker.is_running());
}

#[test_log::test]
fn new_watch_admits_its_first_fix() {
    let provider = FakeGeolocation::default();
    let options = GeolocationOptions::default();
    let mut tracker = tracker();

    tracker.start(&provider, &options).expect("Watch must start");
    assert!(tracker.on_fix(fix(LNG, LAT, 0)).is_some());
    tracker.stop(&provider);

    // Same spot, well inside the interval of the previous watch's last fix
    tracker.start(&provider, &options).expect("Watch must restart");
    assert!(tracker.filter().last().is_none());
    assert!(tracker.on_fix(fix(LNG, LAT, 300)).is_some());
}

#[test_log::test]
fn refused_watch_leaves_tracker_stopped() {
    let provider = FakeGeolocation::default();
    provider.refuse.set(Some(LocationError::PermissionDenied));
    let mut tracker = tracker();

    let result = tracker.start(&provider, &GeolocationOptions::default());

    assert_eq!(result, Err(LocationError::PermissionDenied));
    assert!(!tracker.is_running());
    assert_eq!(tracker.watch(), None::<WatchId>);
}

#[test_log::test]
fn only_first_accepted_fix_recentres() {
    let mut tracker = tracker();
    let far = north_of(geo::Point::new(LNG, LAT), 50.0);

    let first = tracker.on_fix(fix(LNG, LAT, 0)).expect("First fix is admitted");
    assert!(first.recentre);

    assert!(tracker.on_fix(fix(LNG, LAT, 100)).is_none());

    let second = tracker.on_fix(fix(far.x(), far.y(), 200)).expect("Moved far enough");
    assert!(!second.recentre);

    tracker.reset_recentre();
    let third = tracker.on_fix(fix(LNG, LAT, 300)).expect("Moved back");
    assert!(third.recentre);
}

#[test_log::test]
fn adopted_fix_becomes_the_baseline() {
    let mut tracker = tracker();

    tracker.adopt(&fix(LNG, LAT, 0));
    assert!(tracker.on_fix(fix(LNG, LAT, 100)).is_none());
    assert_eq!(tracker.filter().last(), Some(&fix(LNG, LAT, 0)));
}

#[test_log::test]
fn error_codes_follow_the_platform() {
    for code in 1..=3 {
        let error = LocationError::from_code(code).expect("Known code");
        assert_eq!(error.code(), code);
    }

    assert_eq!(LocationError::from_code(0), None);
    assert_eq!(LocationError::from_code(4), None);
    assert_eq!(
        LocationError::Timeout.to_string(),
        "geolocation error 3: timeout"
    );
}
