use std::fmt::{Display, Formatter};

/// Geolocation failures, numbered as the platform reports them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl LocationError {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(LocationError::PermissionDenied),
            2 => Some(LocationError::PositionUnavailable),
            3 => Some(LocationError::Timeout),
            _ => None,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            LocationError::PermissionDenied => 1,
            LocationError::PositionUnavailable => 2,
            LocationError::Timeout => 3,
        }
    }

    /// Message suitable for showing to the walker.
    pub fn message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location access was denied. Allow location access to follow the walk."
            }
            LocationError::PositionUnavailable => {
                "Your position is currently unavailable. Move to open sky and try again."
            }
            LocationError::Timeout => "Finding your position took too long. Please try again.",
        }
    }
}

impl Display for LocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LocationError::PermissionDenied => "permission denied",
            LocationError::PositionUnavailable => "position unavailable",
            LocationError::Timeout => "timeout",
        };

        write!(f, "geolocation error {}: {name}", self.code())
    }
}

impl std::error::Error for LocationError {}
