use geo::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MapEventKind {
    Load,
    Move,
    Zoom,
    Idle,
    SourceData,
    Click,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    Load,
    Move,
    Zoom,
    Idle,
    SourceData { source: String },
    Click { position: Point },
    Error { message: String },
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::Load => MapEventKind::Load,
            MapEvent::Move => MapEventKind::Move,
            MapEvent::Zoom => MapEventKind::Zoom,
            MapEvent::Idle => MapEventKind::Idle,
            MapEvent::SourceData { .. } => MapEventKind::SourceData,
            MapEvent::Click { .. } => MapEventKind::Click,
            MapEvent::Error { .. } => MapEventKind::Error,
        }
    }
}
