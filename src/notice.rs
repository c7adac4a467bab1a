//! User-visible notices.
//!
//! Anything the walker should be told about is funnelled through a
//! [`Notifier`]; everything else is only logged.

use std::fmt::{Display, Formatter};
use std::rc::Rc;

use geo::Point;

use crate::track::LocationError;

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// The directions service answered, but without a usable walking route.
    RouteNotFound { destination: Point },
    /// The directions service could not be reached or its answer was unreadable.
    RoutingFailed,
    Location(LocationError),
    /// Every destination has been visited.
    WalkComplete,
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::RouteNotFound { destination } => {
                write!(
                    f,
                    "No walking route to {:.5}, {:.5} could be found.",
                    destination.y(),
                    destination.x()
                )
            }
            Notice::RoutingFailed => {
                write!(f, "Directions are unavailable right now. Please try again.")
            }
            Notice::Location(error) => write!(f, "{}", error.message()),
            Notice::WalkComplete => write!(f, "You have visited every stop on the walk."),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for Rc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Forwards notices to the log only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        log::info!("Notice: {notice}");
    }
}
