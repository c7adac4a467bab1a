use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// The service answered with a non-success HTTP status.
    Status(u16),
    /// The request never produced a response.
    Transport(String),
    /// The response body could not be read.
    Decode(String),
}

impl Display for RouteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::Status(code) => write!(f, "directions service answered with status {code}"),
            RouteError::Transport(reason) => write!(f, "directions request failed: {reason}"),
            RouteError::Decode(reason) => write!(f, "directions response unreadable: {reason}"),
        }
    }
}

impl std::error::Error for RouteError {}
