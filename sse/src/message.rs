use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The kinds of change a client can be told about. The wire name is what
/// appears on the `event:` line of a server-sent event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CardUpdate,
    CardDeleted,
    ColumnUpdate,
    BoardUpdate,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::CardUpdate => "card_update",
            EventType::CardDeleted => "card_deleted",
            EventType::ColumnUpdate => "column_update",
            EventType::BoardUpdate => "board_update",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One serialized event, shared by every subscriber it is queued for.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub event_type: EventType,
    pub data: Arc<str>,
}

impl Frame {
    pub fn new(event_type: EventType, data: impl Into<Arc<str>>) -> Self {
        Self {
            event_type,
            data: data.into(),
        }
    }

    pub fn event_name(&self) -> &'static str {
        self.event_type.as_str()
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Renders the frame in `text/event-stream` framing.
    pub fn to_wire(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event_name(), self.data)
    }
}

/// Outcome of a single publish, counted per subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Frames queued successfully.
    pub delivered: usize,
    /// Subscribers whose queue was full; they miss this frame.
    pub dropped: usize,
    /// Subscribers whose queue was gone; they have been unregistered.
    pub closed: usize,
}
