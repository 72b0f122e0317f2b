use crate::message::EventType;
use crate::Hub;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;

/// Handles domain events by publishing them on the event hub.
///
/// Every connected client receives every event; clients ignore events for
/// boards they are not viewing.
pub struct SseDomainEventHandler {
    hub: Hub,
}

impl SseDomainEventHandler {
    pub fn new(hub: Hub) -> Self {
        Self { hub }
    }

    fn event_type(event: &DomainEvent) -> EventType {
        match event {
            DomainEvent::CardUpdated { .. } => EventType::CardUpdate,
            DomainEvent::CardDeleted { .. } => EventType::CardDeleted,
            DomainEvent::ColumnUpdated { .. } => EventType::ColumnUpdate,
            DomainEvent::BoardUpdated { .. } => EventType::BoardUpdate,
        }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        let event_type = Self::event_type(event);
        let delivery = self.hub.publish(event_type, event.payload());

        trace!(
            "Handled {event_type} for {} subscriber(s)",
            delivery.delivered + delivery.dropped + delivery.closed
        );
    }
}
